//! Caller-owned sample packet.
//!
//! Collects the stamped samples of several FIFO blocks until the caller hands
//! the packet downstream. Capacity is a const generic; see
//! [`DEFAULT_PACKET_CAPACITY`].

use crate::error::StampError;
use crate::interpolate::interpolate_block;
use crate::sample::{AccelReading, AccelSample};
use crate::time::Timestamp;

pub use crate::config::DEFAULT_PACKET_CAPACITY;

/// Fixed-capacity buffer of timestamped samples.
#[derive(Debug, Clone, Default)]
pub struct SamplePacket<const N: usize> {
    samples: heapless::Vec<AccelSample, N>,
}

impl<const N: usize> SamplePacket<N> {
    /// Create an empty packet.
    pub const fn new() -> Self {
        Self {
            samples: heapless::Vec::new(),
        }
    }

    /// Capacity in samples.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// No samples held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// No room for another sample.
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Free slots.
    pub fn remaining(&self) -> usize {
        N - self.samples.len()
    }

    /// Samples in insertion order.
    pub fn samples(&self) -> &[AccelSample] {
        &self.samples
    }

    /// Drop all samples (after transmission).
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Append one already-stamped sample.
    pub fn push(&mut self, sample: AccelSample) -> Result<(), StampError> {
        self.samples.push(sample).map_err(|_| StampError::BufferFull)
    }

    /// Stamp a whole FIFO block read at `curr` (previous read at `prev`) and
    /// append it.
    ///
    /// All-or-nothing: capacity and timestamps are validated before the first
    /// sample is pushed. An empty block is a no-op.
    pub fn extend_block(
        &mut self,
        prev: Timestamp,
        curr: Timestamp,
        readings: &[AccelReading],
    ) -> Result<usize, StampError> {
        if readings.is_empty() {
            return Ok(0);
        }
        if readings.len() > self.remaining() {
            return Err(StampError::BufferFull);
        }

        let stamps = interpolate_block(prev, curr, readings.len())?;
        for (reading, ts) in readings.iter().zip(stamps) {
            self.push(reading.stamp(ts))?;
        }
        Ok(readings.len())
    }
}
