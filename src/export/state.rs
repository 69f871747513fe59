//! The export state machine.
//!
//! ```text
//!   Idle      ──acquire(Immutable)──> Shared(1)
//!   Shared(n) ──acquire(Immutable)──> Shared(n+1)
//!   Shared(n) ──release(Immutable)──> Shared(n-1), or Idle when n = 1
//!   Idle      ──acquire(Exclusive)──> Exclusive
//!   Exclusive ──release(Exclusive)──> Idle
//! ```
//!
//! There is no edge between `Shared(_)` and `Exclusive`.

use std::fmt;

use crate::error::ExportError;
use crate::export::{ExportFlags, ExportMode};

/// Snapshot of an owner's live exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportState {
    /// No live views. The only state in which the owner may be destroyed.
    Idle,
    /// `n >= 1` live read-only views.
    Shared(usize),
    /// One live read-write view.
    Exclusive,
}

impl ExportState {
    /// Returns true for [`ExportState::Idle`].
    pub fn is_idle(self) -> bool {
        matches!(self, ExportState::Idle)
    }

    /// Number of live views in this state.
    pub fn live_views(self) -> usize {
        match self {
            ExportState::Idle => 0,
            ExportState::Shared(n) => n,
            ExportState::Exclusive => 1,
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportState::Idle => f.write_str("idle"),
            ExportState::Shared(n) => write!(f, "shared({})", n),
            ExportState::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// The two counters every owner keeps.
///
/// Invariant: `exclusive_exported` implies `immutable_references == 0`.
#[derive(Debug, Default)]
pub(crate) struct ExportCounters {
    immutable_references: usize,
    exclusive_exported: bool,
}

impl ExportCounters {
    pub(crate) fn immutable_references(&self) -> usize {
        self.immutable_references
    }

    pub(crate) fn exclusive_exported(&self) -> bool {
        self.exclusive_exported
    }

    pub(crate) fn state(&self) -> ExportState {
        match (self.immutable_references, self.exclusive_exported) {
            (0, false) => ExportState::Idle,
            (0, true) => ExportState::Exclusive,
            (n, false) => ExportState::Shared(n),
            (n, true) => consistency_violation(format_args!(
                "exclusive export coexists with {} immutable exports",
                n
            )),
        }
    }

    /// Validates a request and records the export.
    ///
    /// Checks run in a fixed order: a live exclusive export wins over a
    /// conflicting exclusive request, which wins over malformed flags.
    pub(crate) fn try_acquire(&mut self, flags: ExportFlags) -> Result<ExportMode, ExportError> {
        if self.exclusive_exported {
            return Err(ExportError::AlreadyExclusive);
        }

        if flags.contains(ExportFlags::EXCLUSIVE) && self.immutable_references > 0 {
            return Err(ExportError::ConflictingExclusive);
        }

        let mode = flags.mode()?;
        match mode {
            ExportMode::Exclusive => self.exclusive_exported = true,
            ExportMode::Immutable => {
                self.immutable_references = self
                    .immutable_references
                    .checked_add(1)
                    .unwrap_or_else(|| consistency_violation(format_args!(
                        "immutable export count overflowed"
                    )));
            }
        }
        Ok(mode)
    }

    /// Ends one export of `mode`.
    ///
    /// Panics if no export of that mode is live.
    pub(crate) fn release(&mut self, mode: ExportMode) {
        if self.exclusive_exported == (self.immutable_references > 0) {
            consistency_violation(format_args!(
                "release({}) with no live export (state {:?})",
                mode, self
            ));
        }

        match mode {
            ExportMode::Exclusive => {
                if !self.exclusive_exported {
                    consistency_violation(format_args!(
                        "release(exclusive) while {} immutable exports are live",
                        self.immutable_references
                    ));
                }
                self.exclusive_exported = false;
            }
            ExportMode::Immutable => {
                if self.immutable_references == 0 {
                    consistency_violation(format_args!(
                        "release(immutable) while exclusively exported"
                    ));
                }
                self.immutable_references -= 1;
            }
        }
    }
}

#[cold]
#[track_caller]
fn consistency_violation(detail: fmt::Arguments<'_>) -> ! {
    tracing::error!(%detail, "export bookkeeping violated");
    panic!("export bookkeeping violated: {}", detail);
}
