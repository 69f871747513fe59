//! Typed client views.
//!
//! [`View`] is one wrapper type parameterized by its access capability:
//! [`ReadOnly`] requests an immutable export, [`ReadWrite`] requests the
//! exclusive export and adds [`View::set`]. Both refuse sources that are not
//! one contiguous span of bytes.
//!
//! # Example
//!
//! ```
//! use exportbuf::{BufferOwner, ImmutableView, MutableView};
//!
//! let owner = BufferOwner::new(1000);
//!
//! {
//!     let mut writer = MutableView::new(&owner)?;
//!     writer.set(5, 0x42)?;
//! }
//!
//! let reader = ImmutableView::new(&owner)?;
//! assert_eq!(reader.to_bytes()[5], 0x42);
//! # Ok::<(), exportbuf::ExportError>(())
//! ```

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;

use crate::error::ExportError;
use crate::export::ExportMode;
use crate::handle::{ViewHandle, ViewRef};
use crate::owner::Exporter;

mod sealed {
    pub trait Sealed {}
}

/// Access capability of a [`View`].
pub trait Access: sealed::Sealed {
    /// The export mode this capability requests.
    const MODE: ExportMode;
}

/// Shared read-only capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOnly {}

/// Exclusive read-write capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadWrite {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}

impl Access for ReadOnly {
    const MODE: ExportMode = ExportMode::Immutable;
}

impl Access for ReadWrite {
    const MODE: ExportMode = ExportMode::Exclusive;
}

/// A view that holds one export for as long as it lives.
pub struct View<'a, A: Access> {
    handle: ViewHandle<'a>,
    _access: PhantomData<A>,
}

/// A shared read-only view.
pub type ImmutableView<'a> = View<'a, ReadOnly>;

/// The exclusive read-write view.
pub type MutableView<'a> = View<'a, ReadWrite>;

impl<'a, A: Access> View<'a, A> {
    /// Requests an export of `source` in this view's mode.
    ///
    /// # Errors
    ///
    /// Whatever the source's export returns, or
    /// [`ExportError::NotContiguous`] if the exported bytes are not one
    /// contiguous byte-addressable span. On error nothing stays exported.
    pub fn new<E: Exporter + ?Sized>(source: &'a E) -> Result<Self, ExportError> {
        let handle = source.export(A::MODE)?;

        if !handle.layout().is_byte_contiguous() {
            tracing::debug!(layout = ?handle.layout(), "refusing non-contiguous export");
            return Err(ExportError::NotContiguous);
        }

        Ok(Self {
            handle,
            _access: PhantomData,
        })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    /// Returns true if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    /// Reads the byte at `index`.
    pub fn get(&self, index: usize) -> Result<u8, ExportError> {
        self.handle.get(index)
    }

    /// Copies the viewed bytes into an owned snapshot.
    pub fn to_bytes(&self) -> Bytes {
        self.handle.snapshot()
    }

    /// Borrows the viewed bytes.
    pub fn read(&self) -> Result<ViewRef<'_>, ExportError> {
        self.handle.read()
    }

    /// The underlying handle.
    pub fn handle(&self) -> &ViewHandle<'a> {
        &self.handle
    }

    /// Ends the export.
    pub fn release(self) {
        drop(self);
    }
}

impl View<'_, ReadWrite> {
    /// Writes `value` at `index`.
    ///
    /// # Errors
    ///
    /// [`ExportError::OutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), ExportError> {
        self.handle.set(index, value)
    }

    /// Overwrites the view starting at `offset` with `data`.
    ///
    /// # Errors
    ///
    /// [`ExportError::OutOfRange`] if the write would run past the end.
    /// Nothing is written in that case.
    pub fn copy_from_slice(&mut self, offset: usize, data: &[u8]) -> Result<(), ExportError> {
        let len = self.handle.len();
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= len)
            .ok_or(ExportError::OutOfRange {
                index: offset.saturating_add(data.len()),
                len,
            })?;
        self.handle.write()?[offset..end].copy_from_slice(data);
        Ok(())
    }
}

impl<A: Access> From<View<'_, A>> for Bytes {
    fn from(view: View<'_, A>) -> Bytes {
        view.to_bytes()
    }
}

impl<A: Access> fmt::Debug for View<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("mode", &A::MODE)
            .field("len", &self.len())
            .finish()
    }
}
