//! Configuration for buffer owners.
//!
//! - [`BufferConfig`] - Storage size and element layout
//!
//! # Example
//!
//! ```
//! use exportbuf::{BufferConfig, BufferOwner};
//!
//! // Default configuration: 1000 bytes, byte-addressable
//! let owner = BufferOwner::with_config(BufferConfig::default())?;
//! assert_eq!(owner.len(), 1000);
//!
//! // A buffer of 256 four-byte elements
//! let config = BufferConfig::new(1024)?.with_item_size(4);
//! config.validate()?;
//! # Ok::<(), exportbuf::ExportError>(())
//! ```

use crate::error::ExportError;

/// Default storage size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Default element size in bytes (byte-addressable).
pub const DEFAULT_ITEM_SIZE: usize = 1;

/// Configuration for a [`BufferOwner`](crate::BufferOwner).
///
/// `size` is the total storage in bytes, fixed for the owner's lifetime.
/// `item_size` is the width of one addressable element as advertised to
/// consumers through [`ViewLayout`](crate::ViewLayout). Only views with an
/// `item_size` of 1 are byte-addressable.
///
/// # Constraints
///
/// - `item_size` must be non-zero
/// - `size` must be a multiple of `item_size`
///
/// A zero-sized buffer is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferConfig {
    /// Storage size in bytes.
    size: usize,

    /// Width of one element in bytes.
    item_size: usize,
}

impl BufferConfig {
    /// Creates a byte-addressable configuration of `size` bytes.
    ///
    /// # Errors
    ///
    /// Never fails for `item_size == 1`; returns `Result` so that the
    /// constructor validates the same way [`BufferConfig::validate`] does.
    ///
    /// # Example
    ///
    /// ```
    /// use exportbuf::BufferConfig;
    ///
    /// let config = BufferConfig::new(4096)?;
    /// assert_eq!(config.size(), 4096);
    /// assert_eq!(config.item_size(), 1);
    /// # Ok::<(), exportbuf::ExportError>(())
    /// ```
    pub fn new(size: usize) -> Result<Self, ExportError> {
        let config = Self {
            size,
            item_size: DEFAULT_ITEM_SIZE,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the storage size in bytes.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`BufferConfig::validate`] to check if the configuration is valid.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the element width advertised to consumers.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`BufferConfig::validate`] to check if the configuration is valid.
    ///
    /// # Example
    ///
    /// ```
    /// use exportbuf::BufferConfig;
    ///
    /// let config = BufferConfig::default().with_item_size(8);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn with_item_size(mut self, item_size: usize) -> Self {
        self.item_size = item_size;
        self
    }

    /// Returns the storage size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the element width in bytes.
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use exportbuf::BufferConfig;
    ///
    /// let config = BufferConfig::default().with_item_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.item_size == 0 {
            return Err(ExportError::InvalidConfig {
                message: "item_size must be non-zero",
            });
        }

        if self.size % self.item_size != 0 {
            return Err(ExportError::InvalidConfig {
                message: "size must be a multiple of item_size",
            });
        }

        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BUFFER_SIZE,
            item_size: DEFAULT_ITEM_SIZE,
        }
    }
}
