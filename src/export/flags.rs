//! Access modes and the request flags that select them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::ExportError;

/// The access mode a view is bound to for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// Shared read-only access. Any number may be live at once.
    Immutable,
    /// Read-write access. At most one may be live, and only alone.
    Exclusive,
}

impl ExportMode {
    /// Returns true for [`ExportMode::Exclusive`].
    pub fn is_exclusive(self) -> bool {
        matches!(self, ExportMode::Exclusive)
    }

    /// The single flag bit that requests this mode.
    pub fn flags(self) -> ExportFlags {
        match self {
            ExportMode::Immutable => ExportFlags::IMMUTABLE,
            ExportMode::Exclusive => ExportFlags::EXCLUSIVE,
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Immutable => f.write_str("immutable"),
            ExportMode::Exclusive => f.write_str("exclusive"),
        }
    }
}

impl From<ExportMode> for ExportFlags {
    fn from(mode: ExportMode) -> Self {
        mode.flags()
    }
}

/// Request flags for an export, as a consumer would pass them.
///
/// A valid request sets exactly one of [`ExportFlags::IMMUTABLE`] or
/// [`ExportFlags::EXCLUSIVE`]. Bits outside those two are ignored.
///
/// # Example
///
/// ```
/// use exportbuf::{ExportFlags, ExportMode};
///
/// assert_eq!(ExportFlags::IMMUTABLE.mode()?, ExportMode::Immutable);
/// assert!((ExportFlags::IMMUTABLE | ExportFlags::EXCLUSIVE).mode().is_err());
/// # Ok::<(), exportbuf::ExportError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExportFlags(u32);

impl ExportFlags {
    /// No mode requested.
    pub const NONE: ExportFlags = ExportFlags(0);

    /// Request a shared read-only view.
    pub const IMMUTABLE: ExportFlags = ExportFlags(1 << 0);

    /// Request the exclusive read-write view.
    pub const EXCLUSIVE: ExportFlags = ExportFlags(1 << 1);

    /// Wraps raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        ExportFlags(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is set in `self`.
    pub const fn contains(self, other: ExportFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Resolves the flags to a single mode.
    ///
    /// # Errors
    ///
    /// [`ExportError::InvalidMode`] unless exactly one mode bit is set.
    pub fn mode(self) -> Result<ExportMode, ExportError> {
        let immutable = self.contains(ExportFlags::IMMUTABLE);
        let exclusive = self.contains(ExportFlags::EXCLUSIVE);
        match (immutable, exclusive) {
            (true, false) => Ok(ExportMode::Immutable),
            (false, true) => Ok(ExportMode::Exclusive),
            _ => Err(ExportError::InvalidMode { flags: self }),
        }
    }
}

impl BitOr for ExportFlags {
    type Output = ExportFlags;

    fn bitor(self, rhs: ExportFlags) -> ExportFlags {
        ExportFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ExportFlags {
    fn bitor_assign(&mut self, rhs: ExportFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ExportFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(ExportFlags::IMMUTABLE) {
            names.push("IMMUTABLE");
        }
        if self.contains(ExportFlags::EXCLUSIVE) {
            names.push("EXCLUSIVE");
        }
        if names.is_empty() {
            write!(f, "ExportFlags(NONE)")
        } else {
            write!(f, "ExportFlags({})", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flag_resolves() {
        assert_eq!(ExportFlags::IMMUTABLE.mode(), Ok(ExportMode::Immutable));
        assert_eq!(ExportFlags::EXCLUSIVE.mode(), Ok(ExportMode::Exclusive));
    }

    #[test]
    fn test_neither_or_both_is_invalid() {
        let both = ExportFlags::IMMUTABLE | ExportFlags::EXCLUSIVE;
        assert_eq!(
            both.mode(),
            Err(ExportError::InvalidMode { flags: both })
        );
        assert!(matches!(
            ExportFlags::NONE.mode(),
            Err(ExportError::InvalidMode { .. })
        ));
    }

    #[test]
    fn test_unknown_bits_are_ignored() {
        let flags = ExportFlags::from_bits(0x100) | ExportFlags::EXCLUSIVE;
        assert_eq!(flags.mode(), Ok(ExportMode::Exclusive));
    }

    #[test]
    fn test_mode_flags_round_trip() {
        for mode in [ExportMode::Immutable, ExportMode::Exclusive] {
            assert_eq!(ExportFlags::from(mode).mode(), Ok(mode));
        }
    }

    #[test]
    fn test_debug_names_bits() {
        let both = ExportFlags::IMMUTABLE | ExportFlags::EXCLUSIVE;
        assert_eq!(format!("{:?}", both), "ExportFlags(IMMUTABLE | EXCLUSIVE)");
        assert_eq!(format!("{:?}", ExportFlags::NONE), "ExportFlags(NONE)");
    }
}
