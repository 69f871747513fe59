//! exportbuf
//!
//! Export-ownership tracking for owned byte buffers.
//!
//! A [`BufferOwner`] holds a fixed-size byte region and hands out scoped
//! [`ViewHandle`]s in one of two modes:
//!
//! - [`ExportMode::Immutable`] - read-only, any number at once
//! - [`ExportMode::Exclusive`] - read-write, at most one, and only alone
//!
//! A mutable view never coexists with any other live view. Handles borrow
//! their owner, so the owner cannot be destroyed while one is alive, and
//! each handle ends its export exactly once when it is released or dropped.
//!
//! The crate intentionally:
//! - does NOT define a byte layout beyond element width
//! - does NOT serialize or perform I/O
//! - does NOT block: every request succeeds or fails immediately
//!
//! It only tracks **who may currently see or mutate** a buffer.
//!
//! # Handles
//!
//! ```
//! use exportbuf::{BufferOwner, ExportError, ExportMode, ExportState};
//!
//! let owner = BufferOwner::new(1000);
//!
//! let mut writer = owner.acquire(ExportMode::Exclusive)?;
//! assert_eq!(
//!     owner.acquire(ExportMode::Immutable).unwrap_err(),
//!     ExportError::AlreadyExclusive
//! );
//! writer.set(5, 0x42)?;
//! drop(writer);
//!
//! let reader = owner.acquire(ExportMode::Immutable)?;
//! assert_eq!(reader.get(5)?, 0x42);
//! assert_eq!(owner.state(), ExportState::Shared(1));
//! # Ok::<(), ExportError>(())
//! ```
//!
//! # Typed views
//!
//! ```
//! use exportbuf::{BufferOwner, ImmutableView, MutableView};
//!
//! let owner = BufferOwner::new(16);
//! MutableView::new(&owner)?.set(0, 7)?;
//!
//! let snapshot = ImmutableView::new(&owner)?.to_bytes();
//! assert_eq!(snapshot[0], 7);
//! # Ok::<(), exportbuf::ExportError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod export;
mod handle;
mod owner;
mod view;

//
// Public surface
//

pub use config::{BufferConfig, DEFAULT_BUFFER_SIZE, DEFAULT_ITEM_SIZE};
pub use error::ExportError;
pub use export::{ExportFlags, ExportMode, ExportState};
pub use handle::{ViewHandle, ViewLayout, ViewMut, ViewRef};
pub use owner::{BufferOwner, Exporter};
pub use view::{Access, ImmutableView, MutableView, ReadOnly, ReadWrite, View};

/// Result alias with [`ExportError`] as the default error.
pub type Result<T, E = ExportError> = std::result::Result<T, E>;
