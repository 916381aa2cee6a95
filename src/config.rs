//! Configuration traits and implementations for FIFO and packet sizing.
//!
//! The `SamplerConfig` trait allows compile-time configuration of FIFO block
//! size, packet capacity and clock regression handling without runtime overhead.

/// What the drain loop does when a FIFO read is stamped earlier than the
/// previous read (clock adjustment, rollover).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegressionPolicy {
    /// Fail the block with `StampError::ClockRegression`; baseline unchanged
    Reject = 0,

    /// Treat the read as happening at the previous timestamp
    Clamp = 1,

    /// Adopt the new timestamp as baseline; the whole block gets it
    Resync = 2,
}

/// Sampler configuration trait defining FIFO and packet sizing.
///
/// All values are const (zero runtime cost).
pub trait SamplerConfig {
    /// Most readings moved by one FIFO drain call (default: 32)
    ///
    /// Must be between 1 and [`MAX_FIFO_DEPTH`](crate::drain::MAX_FIFO_DEPTH);
    /// `FifoDrain::new` fails to compile otherwise. Blocks holding more
    /// readings are drained over several calls.
    const SAMPLES_PER_FIFO: usize;

    /// FIFO blocks collected into one packet (default: 5)
    const FIFO_BLOCKS_PER_PACKET: usize;

    /// Packet capacity in samples
    const MAX_SAMPLES_PER_PACKET: usize = Self::SAMPLES_PER_FIFO * Self::FIFO_BLOCKS_PER_PACKET;

    /// Clock regression handling (default: Reject)
    const REGRESSION_POLICY: RegressionPolicy;
}

/// Default configuration matching a 32-sample accelerometer FIFO.
///
/// - SAMPLES_PER_FIFO: 32
/// - FIFO_BLOCKS_PER_PACKET: 5
/// - MAX_SAMPLES_PER_PACKET: 160
/// - REGRESSION_POLICY: Reject
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl SamplerConfig for DefaultConfig {
    const SAMPLES_PER_FIFO: usize = 32;
    const FIFO_BLOCKS_PER_PACKET: usize = 5;
    const REGRESSION_POLICY: RegressionPolicy = RegressionPolicy::Reject;
}

/// Minimal configuration for memory-limited devices.
///
/// - SAMPLES_PER_FIFO: 16
/// - FIFO_BLOCKS_PER_PACKET: 1
/// - MAX_SAMPLES_PER_PACKET: 16
/// - REGRESSION_POLICY: Clamp
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl SamplerConfig for MinimalConfig {
    const SAMPLES_PER_FIFO: usize = 16;
    const FIFO_BLOCKS_PER_PACKET: usize = 1;
    const REGRESSION_POLICY: RegressionPolicy = RegressionPolicy::Clamp;
}

/// Default packet capacity (`DefaultConfig::MAX_SAMPLES_PER_PACKET`).
pub const DEFAULT_PACKET_CAPACITY: usize = DefaultConfig::MAX_SAMPLES_PER_PACKET;
