//! Error types for timestamping operations.
//!
//! The `StampError` enum covers invalid interpolation arguments, clock
//! regression, buffer capacity and collaborator failures.

use crate::time::Timestamp;
use core::fmt;

/// Timestamping error type.
///
/// Every precondition of the interpolator is checked and reported here
/// instead of reaching integer division or unsigned wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampError {
    /// FIFO sample count was zero
    ZeroSampleCount,

    /// Sample offset is not inside the FIFO block
    OffsetOutOfRange {
        /// Offending zero-based offset
        offset: usize,
        /// Number of samples in the block
        count: usize,
    },

    /// Current read timestamp is earlier than the previous one
    ClockRegression {
        /// Timestamp of the previous FIFO read
        previous: Timestamp,
        /// Timestamp of the current FIFO read
        current: Timestamp,
    },

    /// Buffer capacity exceeded
    BufferFull,

    /// Drain loop used before `start()`
    NotStarted,

    /// Clock collaborator reported an error
    ClockFault,

    /// FIFO collaborator reported an error
    FifoFault,
}

impl fmt::Display for StampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampError::ZeroSampleCount => write!(f, "FIFO sample count is zero"),
            StampError::OffsetOutOfRange { offset, count } => {
                write!(f, "Offset {} outside FIFO block of {}", offset, count)
            }
            StampError::ClockRegression { previous, current } => write!(
                f,
                "Clock went backwards: {} ms after {} ms",
                current.as_millis(),
                previous.as_millis()
            ),
            StampError::BufferFull => write!(f, "Buffer full"),
            StampError::NotStarted => write!(f, "Drain not started"),
            StampError::ClockFault => write!(f, "Clock error"),
            StampError::FifoFault => write!(f, "FIFO error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StampError {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            StampError::ZeroSampleCount => defmt::write!(f, "ZeroSampleCount"),
            StampError::OffsetOutOfRange { offset, count } => {
                defmt::write!(f, "OffsetOutOfRange({}, {})", offset, count)
            }
            StampError::ClockRegression { previous, current } => defmt::write!(
                f,
                "ClockRegression({}, {})",
                previous.as_millis(),
                current.as_millis()
            ),
            StampError::BufferFull => defmt::write!(f, "BufferFull"),
            StampError::NotStarted => defmt::write!(f, "NotStarted"),
            StampError::ClockFault => defmt::write!(f, "ClockFault"),
            StampError::FifoFault => defmt::write!(f, "FifoFault"),
        }
    }
}
