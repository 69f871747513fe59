//! The owner side of the export protocol.

use std::fmt;

use parking_lot::{Mutex, RwLock};

use crate::config::BufferConfig;
use crate::error::ExportError;
use crate::export::{ExportCounters, ExportFlags, ExportMode, ExportState};
use crate::handle::ViewHandle;

/// Owns a fixed-size byte region and tracks who may currently see it.
///
/// Views are granted in one of two modes: any number of
/// [`Immutable`](ExportMode::Immutable) views, or a single
/// [`Exclusive`](ExportMode::Exclusive) view, never both. Every granted
/// [`ViewHandle`] borrows the owner, so the owner cannot be moved or
/// destroyed while a view is live.
///
/// # Example
///
/// ```
/// use exportbuf::{BufferOwner, ExportError, ExportMode, ExportState};
///
/// let owner = BufferOwner::new(1000);
///
/// let a = owner.acquire(ExportMode::Immutable)?;
/// let b = owner.acquire(ExportMode::Immutable)?;
/// assert_eq!(owner.state(), ExportState::Shared(2));
/// assert_eq!(
///     owner.acquire(ExportMode::Exclusive).unwrap_err(),
///     ExportError::ConflictingExclusive
/// );
///
/// drop((a, b));
/// assert_eq!(owner.state(), ExportState::Idle);
/// owner.destroy();
/// # Ok::<(), ExportError>(())
/// ```
pub struct BufferOwner {
    storage: RwLock<Box<[u8]>>,
    counters: Mutex<ExportCounters>,
    config: BufferConfig,
}

impl BufferOwner {
    /// Allocates `size` zeroed, byte-addressable bytes.
    pub fn new(size: usize) -> Self {
        Self::from_valid_config(BufferConfig::default().with_size(size))
    }

    /// Allocates zeroed storage described by `config`.
    ///
    /// # Errors
    ///
    /// [`ExportError::InvalidConfig`] if the configuration does not validate.
    pub fn with_config(config: BufferConfig) -> Result<Self, ExportError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: BufferConfig) -> Self {
        Self {
            storage: RwLock::new(vec![0u8; config.size()].into_boxed_slice()),
            counters: Mutex::new(ExportCounters::default()),
            config,
        }
    }

    /// Storage size in bytes.
    pub fn len(&self) -> usize {
        self.config.size()
    }

    /// Returns true if the storage holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.config.size() == 0
    }

    /// The configuration the owner was built with.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Grants a view in `mode`.
    ///
    /// # Errors
    ///
    /// - [`ExportError::AlreadyExclusive`] if an exclusive view is live
    /// - [`ExportError::ConflictingExclusive`] if `mode` is exclusive and
    ///   read-only views are live
    ///
    /// A failed request changes nothing.
    pub fn acquire(&self, mode: ExportMode) -> Result<ViewHandle<'_>, ExportError> {
        self.acquire_with_flags(mode.flags())
    }

    /// Grants a view selected by raw request flags.
    ///
    /// # Errors
    ///
    /// As [`BufferOwner::acquire`], plus [`ExportError::InvalidMode`] if
    /// `flags` does not name exactly one mode. A live exclusive export or a
    /// conflicting exclusive request is reported before malformed flags.
    pub fn acquire_with_flags(&self, flags: ExportFlags) -> Result<ViewHandle<'_>, ExportError> {
        let mut counters = self.counters.lock();
        let outcome = counters.try_acquire(flags);
        match outcome {
            Ok(mode) => {
                tracing::trace!(
                    %mode,
                    immutable_references = counters.immutable_references(),
                    exclusive = counters.exclusive_exported(),
                    "export granted"
                );
                drop(counters);
                Ok(ViewHandle::new(self, mode))
            }
            Err(err) => {
                tracing::debug!(
                    ?flags,
                    state = %counters.state(),
                    error = %err,
                    "export rejected"
                );
                Err(err)
            }
        }
    }

    /// Ends one export of `mode`. Called exactly once per granted handle.
    pub(crate) fn release(&self, mode: ExportMode) {
        let mut counters = self.counters.lock();
        counters.release(mode);
        tracing::trace!(
            %mode,
            immutable_references = counters.immutable_references(),
            exclusive = counters.exclusive_exported(),
            "export released"
        );
    }

    pub(crate) fn storage(&self) -> &RwLock<Box<[u8]>> {
        &self.storage
    }

    /// Current export state.
    pub fn state(&self) -> ExportState {
        self.counters.lock().state()
    }

    /// Number of live read-only views.
    pub fn immutable_references(&self) -> usize {
        self.counters.lock().immutable_references()
    }

    /// Returns true while an exclusive view is live.
    pub fn is_exclusively_exported(&self) -> bool {
        self.counters.lock().exclusive_exported()
    }

    /// Destroys the owner and frees its storage.
    ///
    /// Live handles borrow the owner, so this normally cannot be called
    /// before they are gone. A handle leaked with [`std::mem::forget`]
    /// leaves its export outstanding forever.
    ///
    /// # Panics
    ///
    /// If any export is still outstanding. Dropping the owner performs the
    /// same check.
    pub fn destroy(self) {
        tracing::trace!(len = self.len(), "destroying buffer owner");
        drop(self);
    }
}

impl Drop for BufferOwner {
    fn drop(&mut self) {
        let state = self.counters.get_mut().state();
        if state.is_idle() {
            return;
        }

        tracing::error!(%state, "deallocated buffer object has exported buffers");
        // A second panic during unwinding would abort the process.
        if !std::thread::panicking() {
            panic!("deallocated buffer object has exported buffers ({})", state);
        }
    }
}

impl fmt::Debug for BufferOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferOwner")
            .field("len", &self.len())
            .field("item_size", &self.config.item_size())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_new_is_zeroed_and_idle() {
        let owner = BufferOwner::new(16);
        assert_eq!(owner.len(), 16);
        assert_eq!(owner.state(), ExportState::Idle);
        assert!(owner.storage().read().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = BufferConfig::default().with_size(10).with_item_size(4);
        assert!(matches!(
            BufferOwner::with_config(config),
            Err(ExportError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_counters_exposed() {
        let owner = BufferOwner::new(8);
        let view = owner.acquire(ExportMode::Immutable).unwrap();
        assert_eq!(owner.immutable_references(), 1);
        assert!(!owner.is_exclusively_exported());
        drop(view);

        let view = owner.acquire(ExportMode::Exclusive).unwrap();
        assert_eq!(owner.immutable_references(), 0);
        assert!(owner.is_exclusively_exported());
        drop(view);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let owner = BufferOwner::new(8);
        let err = owner.acquire_with_flags(ExportFlags::NONE).unwrap_err();
        assert!(matches!(err, ExportError::InvalidMode { .. }));
        assert_eq!(owner.state(), ExportState::Idle);
    }

    #[test]
    fn test_debug_does_not_dump_storage() {
        let owner = BufferOwner::new(4);
        let s = format!("{:?}", owner);
        assert!(s.contains("len: 4"));
        assert!(s.contains("Idle"));
    }

    #[test]
    #[should_panic(expected = "deallocated buffer object has exported buffers")]
    fn test_destroy_with_leaked_view_panics() {
        let owner = BufferOwner::new(4);
        std::mem::forget(owner.acquire(ExportMode::Immutable).unwrap());
        owner.destroy();
    }

    #[test]
    #[traced_test]
    fn test_grant_and_rejection_are_logged() {
        let owner = BufferOwner::new(4);
        let writer = owner.acquire(ExportMode::Exclusive).unwrap();
        assert!(owner.acquire(ExportMode::Immutable).is_err());
        drop(writer);

        assert!(logs_contain("export granted"));
        assert!(logs_contain("export rejected"));
        assert!(logs_contain("export released"));
    }
}
