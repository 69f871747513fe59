//! Error types for exportbuf.
//!
//! Only recoverable conditions live here. Broken internal invariants (an
//! owner destroyed with live exports, a mode released more often than it
//! was acquired) are assertion failures, not errors.

use thiserror::Error;

use crate::export::ExportFlags;

/// Errors returned by export requests, view access and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// An exclusive export is live, so no other export may be granted.
    #[error("buffer is already exclusively exported")]
    AlreadyExclusive,

    /// Exclusive access was requested while shared readers are live.
    #[error("buffer has immutable exports and cannot be exclusively exported")]
    ConflictingExclusive,

    /// The request flags did not name exactly one access mode.
    #[error("exactly one of EXCLUSIVE or IMMUTABLE must be specified (got {flags:?})")]
    InvalidMode {
        /// The flags that were supplied.
        flags: ExportFlags,
    },

    /// An indexed access fell outside `[0, len)`.
    #[error("index out of range: {index} (len {len})")]
    OutOfRange {
        /// The requested index (or range end).
        index: usize,
        /// The length of the view.
        len: usize,
    },

    /// A write was attempted through a read-only view.
    #[error("view is not writable")]
    NotWritable,

    /// The exported view is not one contiguous span of bytes.
    #[error("buffer is not contiguous")]
    NotContiguous,

    /// The handle has already been released.
    #[error("view has already been released")]
    Released,

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl ExportError {
    /// Returns true if retrying later may succeed (the buffer is merely busy).
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ExportError::AlreadyExclusive | ExportError::ConflictingExclusive
        )
    }
}
