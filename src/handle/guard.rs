//! Borrowed access to a view's bytes.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

/// Read-only slice of a view's bytes.
///
/// Holds the storage lock for reading; drop it before writing through the
/// same owner.
pub struct ViewRef<'v> {
    guard: RwLockReadGuard<'v, Box<[u8]>>,
}

impl<'v> ViewRef<'v> {
    pub(crate) fn new(guard: RwLockReadGuard<'v, Box<[u8]>>) -> Self {
        Self { guard }
    }
}

impl Deref for ViewRef<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard
    }
}

impl AsRef<[u8]> for ViewRef<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for ViewRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRef").field("len", &self.len()).finish()
    }
}

/// Mutable slice of an exclusive view's bytes.
pub struct ViewMut<'v> {
    guard: RwLockWriteGuard<'v, Box<[u8]>>,
}

impl<'v> ViewMut<'v> {
    pub(crate) fn new(guard: RwLockWriteGuard<'v, Box<[u8]>>) -> Self {
        Self { guard }
    }
}

impl Deref for ViewMut<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard
    }
}

impl DerefMut for ViewMut<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.guard
    }
}

impl AsRef<[u8]> for ViewMut<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl AsMut<[u8]> for ViewMut<'_> {
    fn as_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl fmt::Debug for ViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut").field("len", &self.len()).finish()
    }
}
