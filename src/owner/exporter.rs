//! The producer side of the export protocol, as seen by consumers.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::ExportError;
use crate::export::ExportMode;
use crate::handle::ViewHandle;
use crate::owner::BufferOwner;

/// A source that can grant views of its bytes.
///
/// Consumers such as [`View`](crate::View) are written against this trait
/// rather than [`BufferOwner`] so that shared owners (`Arc<BufferOwner>`,
/// `&BufferOwner`) work the same way.
pub trait Exporter {
    /// Requests a view in `mode`.
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError>;
}

impl Exporter for BufferOwner {
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        self.acquire(mode)
    }
}

impl<T: Exporter + ?Sized> Exporter for &T {
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        (**self).export(mode)
    }
}

impl<T: Exporter + ?Sized> Exporter for Box<T> {
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        (**self).export(mode)
    }
}

impl<T: Exporter + ?Sized> Exporter for Rc<T> {
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        (**self).export(mode)
    }
}

impl<T: Exporter + ?Sized> Exporter for Arc<T> {
    fn export(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        (**self).export(mode)
    }
}
