use alloc::{
    borrow::Cow,
    boxed::Box,
    collections::{BTreeMap, BTreeSet, VecDeque},
    rc::Rc,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::marker::PhantomData;

use super::{Composite, Inspect, Key, Number, Value};

macro_rules! inspect_int {
    ($variant:ident as $repr:ty: $($ty:ty),*) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self) -> Value<'_> {
                    Value::Number(Number::$variant(*self as $repr))
                }
            }
        )*
    };
}

inspect_int!(Int as i64: i8, i16, i32, i64, isize);
inspect_int!(UInt as u64: u8, u16, u32, u64, usize);

impl Inspect for f32 {
    fn inspect(&self) -> Value<'_> {
        Value::Number(Number::Float(f64::from(*self)))
    }
}

impl Inspect for f64 {
    fn inspect(&self) -> Value<'_> {
        Value::Number(Number::Float(*self))
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Inspect for char {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Owned(self.to_string()))
    }
}

impl Inspect for str {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl Inspect for () {
    fn inspect(&self) -> Value<'_> {
        Value::Null
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value<'_> {
        match self {
            Some(value) => value.inspect(),
            None => Value::Null,
        }
    }

    fn custom_html(&self) -> Option<String> {
        self.as_ref()?.custom_html()
    }
}

impl Inspect for Value<'_> {
    fn inspect(&self) -> Value<'_> {
        self.clone()
    }
}

macro_rules! inspect_deref {
    ($($ty:ty),*) => {
        $(
            impl<T: Inspect + ?Sized> Inspect for $ty {
                fn inspect(&self) -> Value<'_> {
                    (**self).inspect()
                }

                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }

                fn custom_html(&self) -> Option<String> {
                    (**self).custom_html()
                }
            }
        )*
    };
}

inspect_deref!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

impl<T: Inspect, S> Inspect for hashbrown::HashSet<T, S> {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

#[cfg(feature = "std")]
impl<T: Inspect, S> Inspect for std::collections::HashSet<T, S> {
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self))
    }
}

macro_rules! inspect_tuple {
    ($($name:ident)+) => {
        impl<$($name: Inspect),+> Inspect for ($($name,)+) {
            #[allow(non_snake_case)]
            fn inspect(&self) -> Value<'_> {
                let ($($name,)+) = self;
                let mut list = Composite::new();
                $(list.push($name as &dyn Inspect);)+
                Value::Composite(list)
            }
        }
    };
}

inspect_tuple!(A);
inspect_tuple!(A B);
inspect_tuple!(A B C);
inspect_tuple!(A B C D);

macro_rules! inspect_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
            fn inspect(&self) -> Value<'_> {
                Value::Callable(core::any::type_name::<Self>())
            }
        }
    };
}

inspect_fn!();
inspect_fn!(A);
inspect_fn!(A, B);
inspect_fn!(A, B, C);

/// Conversion of a map key into a [`Key`].
///
/// Non-negative integers become [`Key::Index`], so a map keyed from `0` is
/// displayed as a list.
pub trait InspectKey {
    /// The key.
    fn key(&self) -> Key<'_>;
}

impl InspectKey for str {
    fn key(&self) -> Key<'_> {
        Key::Name(Cow::Borrowed(self))
    }
}

impl InspectKey for String {
    fn key(&self) -> Key<'_> {
        Key::Name(Cow::Borrowed(self))
    }
}

impl InspectKey for Cow<'_, str> {
    fn key(&self) -> Key<'_> {
        Key::Name(Cow::Borrowed(self))
    }
}

impl InspectKey for char {
    fn key(&self) -> Key<'_> {
        Key::Name(Cow::Owned(self.to_string()))
    }
}

impl InspectKey for bool {
    fn key(&self) -> Key<'_> {
        Key::Name(Cow::Borrowed(if *self { "true" } else { "false" }))
    }
}

impl<K: InspectKey + ?Sized> InspectKey for &K {
    fn key(&self) -> Key<'_> {
        (**self).key()
    }
}

macro_rules! key_int {
    ($($ty:ty),*) => {
        $(
            impl InspectKey for $ty {
                fn key(&self) -> Key<'_> {
                    match usize::try_from(*self) {
                        Ok(index) => Key::Index(index),
                        Err(_) => Key::Name(Cow::Owned(self.to_string())),
                    }
                }
            }
        )*
    };
}

key_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn map_of<'a, K, V>(entries: impl IntoIterator<Item = (&'a K, &'a V)>) -> Value<'a>
where
    K: InspectKey + ?Sized + 'a,
    V: Inspect + 'a,
{
    let mut map = Composite::new();
    for (key, value) in entries {
        map.insert(key.key(), value);
    }
    Value::Composite(map)
}

impl<K: InspectKey, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value<'_> {
        map_of(self)
    }
}

impl<K: InspectKey, V: Inspect, S> Inspect for hashbrown::HashMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        map_of(self)
    }
}

impl<K: InspectKey, V: Inspect, S> Inspect for indexmap::IndexMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        map_of(self)
    }
}

#[cfg(feature = "std")]
impl<K: InspectKey, V: Inspect, S> Inspect for std::collections::HashMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        map_of(self)
    }
}

/// Inspects a cloneable iterator over references without consuming it.
///
/// The iterator is cloned and the clone materialized, so the wrapped
/// iterator stays untouched. Iterators that cannot be cloned cannot be
/// inspected at all, which keeps a debugging call from draining a single-use
/// sequence.
///
/// At most [`Snapshot::DEFAULT_LIMIT`] items are taken, so endless
/// iterators can be inspected too. The limit should stay above
/// [`Settings::max_list_items`](crate::Settings::max_list_items) for the
/// rendered list to show its truncation marker.
///
/// ```
/// use webconsole::value::{Inspect, Kind, Snapshot};
///
/// let items = [1, 2, 3];
/// let iter = items.iter().skip(1);
/// assert_eq!(Snapshot::new(iter.clone()).inspect().kind(), Kind::List);
/// assert_eq!(iter.count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Snapshot<'a, I> {
    iter: I,
    limit: usize,
    _items: PhantomData<&'a ()>,
}

impl<I> Snapshot<'_, I> {
    /// How many items a snapshot takes unless told otherwise.
    pub const DEFAULT_LIMIT: usize = 1024;

    /// Wraps `iter`.
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            limit: Self::DEFAULT_LIMIT,
            _items: PhantomData,
        }
    }

    /// Takes at most `limit` items instead of [`Self::DEFAULT_LIMIT`].
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl<'a, I, T> Inspect for Snapshot<'a, I>
where
    I: Iterator<Item = &'a T> + Clone,
    T: Inspect + 'a,
{
    fn inspect(&self) -> Value<'_> {
        Value::Composite(Composite::list(self.iter.clone().take(self.limit)))
    }
}

impl Value<'_> {
    /// Detaches the value from whatever it borrows.
    ///
    /// Borrowed composite entries are converted along the way, down to
    /// `max_depth` levels; deeper composites are cut off as `(...)`.
    pub fn into_static_with_depth(self, max_depth: usize) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Number(n) => Value::Number(n),
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Callable(name) => Value::Callable(name),
            Value::Raw(s) => Value::Raw(Cow::Owned(s.into_owned())),
            Value::Composite(composite) => {
                if max_depth == 0 {
                    return Value::Raw(Cow::Borrowed("<i>(...)</i>"));
                }
                let mut detached = match composite.object {
                    Some(info) => Composite::object(info),
                    None => Composite::new(),
                };
                for (key, entry) in composite.iter() {
                    let key = match key {
                        Key::Index(index) => Key::Index(*index),
                        Key::Name(name) => Key::Name(Cow::Owned(name.clone().into_owned())),
                    };
                    let value = entry
                        .resolve()
                        .into_owned()
                        .into_static_with_depth(max_depth - 1);
                    detached.insert(key, value);
                }
                Value::Composite(detached)
            }
        }
    }

    /// Detaches the value with a generous depth limit.
    pub fn into_static(self) -> Value<'static> {
        self.into_static_with_depth(16)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::value::Kind;

    #[test]
    fn test_scalars() {
        assert!(matches!(7u8.inspect(), Value::Number(Number::UInt(7))));
        assert!(matches!((-7i32).inspect(), Value::Number(Number::Int(-7))));
        assert!(matches!(Inspect::inspect(&None::<u8>), Value::Null));
        assert!(matches!(Inspect::inspect(&Some("x")), Value::Str(s) if s == "x"));
        assert!(matches!('c'.inspect(), Value::Str(s) if s == "c"));
    }

    #[test]
    fn test_snapshot_of_endless_iterator() {
        let one = 1u8;
        let endless = core::iter::repeat(&one);
        let len = |value: Value<'_>| value.as_composite().map(Composite::len);
        assert_eq!(len(Snapshot::new(endless.clone()).inspect()), Some(Snapshot::<'_, ()>::DEFAULT_LIMIT));
        assert_eq!(len(Snapshot::new(endless).with_limit(31).inspect()), Some(31));

        let items = [1, 2, 3];
        assert_eq!(len(Snapshot::new(items.iter()).with_limit(10).inspect()), Some(3));
    }

    #[test]
    fn test_map_keys_classify() {
        let mut by_index = BTreeMap::new();
        by_index.insert(0usize, "a");
        by_index.insert(1usize, "b");
        assert_eq!(by_index.inspect().kind(), Kind::List);

        let mut by_name = BTreeMap::new();
        by_name.insert("x", 1);
        assert_eq!(by_name.inspect().kind(), Kind::Map);

        let mut negative = BTreeMap::new();
        negative.insert(-1i32, 1);
        let value = negative.inspect();
        let keys: Vec<_> = value
            .as_composite()
            .map(|c| c.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec![Key::Name(Cow::Borrowed("-1"))]);
    }

    #[test]
    fn test_tuple_and_fn() {
        let pair = (1, "two");
        assert_eq!(pair.inspect().as_composite().map(Composite::len), Some(2));

        fn double(x: u32) -> u32 {
            x * 2
        }
        let f: fn(u32) -> u32 = double;
        assert_eq!(f.inspect().kind(), Kind::OpaqueCallable);
    }

    #[test]
    fn test_deref_keeps_type_name() {
        let boxed: Box<u16> = Box::new(3);
        assert_eq!(Inspect::type_name(&boxed), "u16");
        assert_eq!(Inspect::type_name(&&boxed), "u16");
    }

    #[test]
    fn test_into_static_cuts_depth() {
        let nested = vec![vec![vec![1]]];
        let detached = nested.inspect().into_static_with_depth(2);
        let outer = detached.as_composite().expect("outer list");
        let inner = outer
            .get(&Key::Index(0))
            .map(|e| e.resolve().into_owned())
            .expect("inner list");
        let cut = inner
            .as_composite()
            .and_then(|c| c.get(&Key::Index(0)))
            .map(|e| e.resolve().into_owned());
        assert!(matches!(cut, Some(Value::Raw(s)) if s == "<i>(...)</i>"));
    }
}
