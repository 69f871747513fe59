//! Scoped view handles.
//!
//! - [`ViewHandle`] - One granted export, released exactly once
//! - [`ViewLayout`] - Shape metadata consumers check before indexing
//! - [`ViewRef`] / [`ViewMut`] - Borrowed slices of a view's bytes

mod guard;
mod layout;
mod view_handle;

pub use guard::{ViewMut, ViewRef};
pub use layout::ViewLayout;
pub use view_handle::ViewHandle;
