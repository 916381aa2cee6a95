//! Millisecond timestamp type.

use core::fmt;

/// Unsigned count of milliseconds since an epoch.
///
/// Immutable once read from the clock. `Display` renders the plain digit
/// form (same as [`Digits`](crate::format::Digits)).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch itself.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Wrap a millisecond count.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Millisecond count since the epoch.
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&crate::format::Digits(*self), f)
    }
}
