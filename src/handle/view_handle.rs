//! The consumer side of one granted export.

use std::fmt;
use std::ops::Range;

use bytes::Bytes;

use crate::error::ExportError;
use crate::export::ExportMode;
use crate::handle::{ViewLayout, ViewMut, ViewRef};
use crate::owner::BufferOwner;

/// A scoped capability over an owner's bytes, bound to one [`ExportMode`].
///
/// Handles are only produced by a successful
/// [`BufferOwner::acquire`]. The export ends exactly once: on
/// [`ViewHandle::release`] or on drop, whichever comes first. After release
/// every accessor fails with [`ExportError::Released`].
///
/// # Example
///
/// ```
/// use exportbuf::{BufferOwner, ExportError, ExportMode};
///
/// let owner = BufferOwner::new(1000);
///
/// let mut writer = owner.acquire(ExportMode::Exclusive)?;
/// writer.set(5, 0x42)?;
/// drop(writer);
///
/// let mut reader = owner.acquire(ExportMode::Immutable)?;
/// assert_eq!(reader.get(5)?, 0x42);
/// assert_eq!(reader.set(0, 1), Err(ExportError::NotWritable));
/// # Ok::<(), ExportError>(())
/// ```
#[must_use = "dropping a view handle releases the export immediately"]
pub struct ViewHandle<'a> {
    owner: &'a BufferOwner,
    mode: ExportMode,
    released: bool,
}

impl<'a> ViewHandle<'a> {
    /// Wraps an export the owner has already recorded.
    pub(crate) fn new(owner: &'a BufferOwner, mode: ExportMode) -> Self {
        Self {
            owner,
            mode,
            released: false,
        }
    }

    /// The mode this handle was granted under.
    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    /// Returns true unless the handle is exclusive.
    pub fn is_read_only(&self) -> bool {
        !self.mode.is_exclusive()
    }

    /// Returns true once the export has ended.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The owner that granted this handle.
    pub fn owner(&self) -> &'a BufferOwner {
        self.owner
    }

    /// Length of the view in bytes.
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    /// Returns true if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    /// Shape metadata for contiguity checks.
    pub fn layout(&self) -> ViewLayout {
        ViewLayout {
            len: self.owner.len(),
            item_size: self.owner.config().item_size(),
            readonly: self.is_read_only(),
            contiguous: true,
        }
    }

    /// Returns true if the view is one contiguous span of single bytes.
    pub fn is_contiguous(&self) -> bool {
        self.layout().is_byte_contiguous()
    }

    /// Reads the byte at `index`.
    pub fn get(&self, index: usize) -> Result<u8, ExportError> {
        self.ensure_live()?;
        let len = self.len();
        self.owner
            .storage()
            .read()
            .get(index)
            .copied()
            .ok_or(ExportError::OutOfRange { index, len })
    }

    /// Copies `range` out of the view.
    pub fn copy_range(&self, range: Range<usize>) -> Result<Bytes, ExportError> {
        self.ensure_live()?;
        let len = self.len();
        if range.start > range.end {
            return Err(ExportError::OutOfRange {
                index: range.start,
                len,
            });
        }
        if range.end > len {
            return Err(ExportError::OutOfRange {
                index: range.end,
                len,
            });
        }
        Ok(Bytes::copy_from_slice(&self.owner.storage().read()[range]))
    }

    /// Copies the whole view into an owned snapshot.
    pub fn to_bytes(&self) -> Result<Bytes, ExportError> {
        self.ensure_live()?;
        Ok(self.snapshot())
    }

    /// Borrows the whole view as a read-only slice.
    pub fn read(&self) -> Result<ViewRef<'_>, ExportError> {
        self.ensure_live()?;
        Ok(ViewRef::new(self.owner.storage().read()))
    }

    /// Writes `value` at `index`.
    ///
    /// # Errors
    ///
    /// - [`ExportError::NotWritable`] unless the handle is exclusive
    /// - [`ExportError::OutOfRange`] if `index >= len()`
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), ExportError> {
        self.ensure_writable()?;
        let len = self.len();
        let mut storage = self.owner.storage().write();
        let slot = storage
            .get_mut(index)
            .ok_or(ExportError::OutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Borrows the whole view as a mutable slice.
    ///
    /// # Errors
    ///
    /// [`ExportError::NotWritable`] unless the handle is exclusive.
    pub fn write(&mut self) -> Result<ViewMut<'_>, ExportError> {
        self.ensure_writable()?;
        Ok(ViewMut::new(self.owner.storage().write()))
    }

    /// Ends the export now. Calling it again has no effect.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.owner.release(self.mode);
    }

    /// Snapshot without the liveness check, for wrappers that hold the
    /// handle for their whole lifetime.
    pub(crate) fn snapshot(&self) -> Bytes {
        Bytes::copy_from_slice(&self.owner.storage().read())
    }

    fn ensure_live(&self) -> Result<(), ExportError> {
        if self.released {
            return Err(ExportError::Released);
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), ExportError> {
        self.ensure_live()?;
        if !self.mode.is_exclusive() {
            return Err(ExportError::NotWritable);
        }
        Ok(())
    }
}

impl Drop for ViewHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ViewHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("mode", &self.mode)
            .field("len", &self.len())
            .field("released", &self.released)
            .finish()
    }
}
