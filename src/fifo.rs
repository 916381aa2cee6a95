//! Accelerometer FIFO abstraction.
//!
//! The source only moves raw readings out of the hardware buffer; the drain
//! loop takes care of timestamps.

use crate::sample::AccelReading;

/// Platform-agnostic FIFO drain.
pub trait FifoSource {
    /// Platform-specific error type
    type Error;

    /// Number of readings currently buffered.
    ///
    /// Read once per block, right after the clock. The drain loop uses it as
    /// the block size, so it must count every reading that arrived before
    /// that clock read, including ones that will not fit in a single `drain`.
    fn fill_level(&mut self) -> Result<usize, Self::Error>;

    /// Move buffered readings into `out`, oldest first.
    ///
    /// Returns the number of readings written, never more than `out.len()`.
    /// `Ok(0)` means the FIFO was empty.
    fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error>;
}

/// Async FIFO drain (requires `async` feature).
///
/// Uses `async fn` without Send bounds for both single and multi-threaded executors.
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncFifoSource {
    /// Platform-specific error type
    type Error;

    /// Async counterpart of [`FifoSource::fill_level`].
    async fn fill_level(&mut self) -> Result<usize, Self::Error>;

    /// Async counterpart of [`FifoSource::drain`].
    async fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error>;
}
