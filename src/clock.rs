//! Clock abstraction supplying FIFO read timestamps.
//!
//! Implement for whatever the platform offers (RTC, SNTP-synced system time,
//! a monotonic tick counter).

use crate::time::Timestamp;

/// Platform-agnostic millisecond clock.
///
/// Values are expected to be non-decreasing across reads. The drain loop
/// detects and handles regressions according to
/// [`SamplerConfig::REGRESSION_POLICY`](crate::config::SamplerConfig::REGRESSION_POLICY).
pub trait Clock {
    /// Platform-specific error type
    type Error;

    /// Current time in milliseconds since the epoch.
    fn now(&mut self) -> Result<Timestamp, Self::Error>;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    type Error = T::Error;

    fn now(&mut self) -> Result<Timestamp, Self::Error> {
        (**self).now()
    }
}
