//! Test fixtures and utilities for fifo-stamp testing.
//!
//! Provides:
//! - `MockClock`: Test implementation of Clock trait (scripted readings)
//! - `MockFifo`: Test implementation of FifoSource trait (queued readings)
//! - Helper functions for common test scenarios

#![allow(dead_code)]

use fifo_stamp::{AccelReading, Clock, FifoSource, Timestamp};
use std::collections::VecDeque;

// ============================================================================
// MockClock - Scripted Clock
// ============================================================================

/// Mock clock returning a scripted sequence of millisecond readings.
///
/// Returns `Err(())` once the script runs out.
#[derive(Debug, Default)]
pub struct MockClock {
    times: VecDeque<u64>,
    reads: usize,
}

impl MockClock {
    /// Create clock that will return `times` in order.
    pub fn with_times(times: &[u64]) -> Self {
        Self {
            times: times.iter().copied().collect(),
            reads: 0,
        }
    }

    /// Append a reading to the script.
    pub fn push_time(&mut self, t: u64) {
        self.times.push_back(t);
    }

    /// Number of successful reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Clock for MockClock {
    type Error = ();

    fn now(&mut self) -> Result<Timestamp, Self::Error> {
        let t = self.times.pop_front().ok_or(())?;
        self.reads += 1;
        Ok(Timestamp::from_millis(t))
    }
}

// ============================================================================
// MockFifo - Queued FIFO
// ============================================================================

/// Mock FIFO holding queued readings.
///
/// `fill_level` reports the queue length; `drain` moves as many queued
/// readings as fit into the output slice.
#[derive(Debug, Default)]
pub struct MockFifo {
    queue: VecDeque<AccelReading>,
    fail_next: bool,
    drains: usize,
}

impl MockFifo {
    /// Create empty FIFO.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `n` readings whose X axis counts up from `first_x`.
    pub fn push_ramp(&mut self, first_x: i16, n: usize) {
        for i in 0..n {
            self.queue
                .push_back(AccelReading::new(first_x + i as i16, -5, 1000));
        }
    }

    /// Make the next FIFO access (fill level or drain) fail.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Readings still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of drain calls so far.
    pub fn drains(&self) -> usize {
        self.drains
    }

    fn level(&mut self) -> Result<usize, ()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(());
        }
        Ok(self.queue.len())
    }

    fn take(&mut self, out: &mut [AccelReading]) -> Result<usize, ()> {
        self.drains += 1;
        if std::mem::take(&mut self.fail_next) {
            return Err(());
        }

        let n = out.len().min(self.queue.len());
        for slot in &mut out[..n] {
            *slot = self.queue.pop_front().ok_or(())?;
        }
        Ok(n)
    }
}

impl FifoSource for MockFifo {
    type Error = ();

    fn fill_level(&mut self) -> Result<usize, Self::Error> {
        self.level()
    }

    fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error> {
        self.take(out)
    }
}

#[cfg(feature = "async")]
impl fifo_stamp::AsyncFifoSource for MockFifo {
    type Error = ();

    async fn fill_level(&mut self) -> Result<usize, Self::Error> {
        self.level()
    }

    async fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error> {
        self.take(out)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Shorthand for a millisecond timestamp.
pub fn ms(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}
