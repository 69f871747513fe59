//! Export bookkeeping.
//!
//! - [`ExportMode`] - The two access modes a view can be granted
//! - [`ExportFlags`] - Raw request flags, resolved to a mode
//! - [`ExportState`] - Observable state of an owner's exports

mod flags;
mod state;

pub use flags::{ExportFlags, ExportMode};
pub use state::ExportState;

pub(crate) use state::ExportCounters;
