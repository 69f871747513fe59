//! Buffer ownership.
//!
//! - [`BufferOwner`] - Owns the storage and grants views of it
//! - [`Exporter`] - Anything that can grant views

mod buffer;
mod exporter;

pub use buffer::BufferOwner;
pub use exporter::Exporter;
