//! Small, stable identity numbers for inspected objects.
//!
//! The first object seen gets number 1, the next distinct object number 2,
//! and so on. Inspecting the same object again yields the number it got the
//! first time, so repeated appearances of one instance can be correlated on
//! the page. Objects are told apart by address and type; an address reused
//! after the original object was dropped maps to the old number until the
//! table is [reset](ObjectIds::reset).

use core::any::TypeId;

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::lock::Lock;

/// The identity of an object: its address together with its type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    /// The identity of the object `value` points at.
    pub fn of<T: ?Sized + 'static>(value: &T) -> Self {
        Self {
            address: core::ptr::from_ref(value).cast::<()>() as usize,
            type_id: TypeId::of::<T>(),
        }
    }
}

#[derive(Default)]
struct IdTable {
    ids: HashMap<Identity, u32, FxBuildHasher>,
    last: u32,
}

/// A table assigning identity numbers to objects.
///
/// Owned by a [`Console`](crate::Console) and reset with it between requests.
#[derive(Default)]
pub struct ObjectIds(Lock<IdTable>);

impl ObjectIds {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of `identity`, assigning the next free number if
    /// it was never seen.
    pub fn id_of(&self, identity: Identity) -> u32 {
        let mut table = self.0.write();
        if let Some(&id) = table.ids.get(&identity) {
            return id;
        }
        table.last += 1;
        let id = table.last;
        table.ids.insert(identity, id);
        id
    }

    /// The number of distinct objects seen.
    pub fn len(&self) -> usize {
        self.0.read().ids.len()
    }

    /// Whether no object was seen yet.
    pub fn is_empty(&self) -> bool {
        self.0.read().ids.is_empty()
    }

    /// Forgets all objects and restarts numbering at 1.
    pub fn reset(&self) {
        let mut table = self.0.write();
        table.ids.clear();
        table.last = 0;
    }
}

impl core::fmt::Debug for ObjectIds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectIds").field("len", &self.len()).finish()
    }
}
