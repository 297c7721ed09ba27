//! A thin read/write lock used for the console's shared state.
//!
//! All shared state in this crate (panel buffers, the panel registry, the
//! object identity table and the installed console) is guarded by this lock.
//! It is backed by [`spin::RwLock`], so acquiring it never fails and never
//! poisons.

use core::ops::{Deref, DerefMut};

#[repr(transparent)]
pub(crate) struct Lock<T>(spin::RwLock<T>);

#[repr(transparent)]
pub(crate) struct LockReadGuard<'a, T>(spin::RwLockReadGuard<'a, T>);

#[repr(transparent)]
pub(crate) struct LockWriteGuard<'a, T>(spin::RwLockWriteGuard<'a, T>);

impl<T> Lock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(spin::RwLock::new(value))
    }

    #[inline]
    pub(crate) fn read(&self) -> LockReadGuard<'_, T> {
        LockReadGuard(self.0.read())
    }

    #[inline]
    pub(crate) fn write(&self) -> LockWriteGuard<'_, T> {
        LockWriteGuard(self.0.write())
    }
}

impl<T: Default> Default for Lock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for LockReadGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Deref for LockWriteGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for LockWriteGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Lock<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&*self.read(), f)
    }
}
