//! FIFO drain loop.
//!
//! `FifoDrain` owns the clock, the FIFO source and the timestamp of the
//! previous read. A block begins with a clock read followed by a FIFO
//! fill-level query; every reading counted then is stamped against that
//! interval, however many [`FifoDrain::drain_block`] calls it takes to move
//! them into packets. Later calls continue the open block without touching
//! the clock until it is used up.
//!
//! Clock regression is resolved before the FIFO is queried, so a rejected
//! block leaves its readings in the hardware buffer.

use crate::clock::Clock;
use crate::config::{RegressionPolicy, SamplerConfig};
use crate::error::StampError;
use crate::fifo::FifoSource;
use crate::interpolate::{BlockStamps, interpolate_block};
use crate::packet::SamplePacket;
use crate::sample::AccelReading;
use crate::time::Timestamp;
use core::marker::PhantomData;

#[cfg(feature = "async")]
use crate::fifo::AsyncFifoSource;

/// Largest number of readings moved by one FIFO drain call.
pub const MAX_FIFO_DEPTH: usize = 64;

/// Drain loop state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrainState {
    /// No baseline timestamp yet
    Inactive,

    /// Baseline recorded, blocks can be drained
    Active,
}

/// Running counters since construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Blocks opened (including empty ones)
    pub blocks: u32,
    /// Samples stamped
    pub samples: u32,
    /// Reads stamped earlier than their predecessor
    pub regressions: u32,
}

/// FIFO drain orchestration.
///
/// Generic over:
/// - `CLK`: Clock implementation
/// - `F`: FifoSource (or AsyncFifoSource) implementation
/// - `C`: SamplerConfig implementation
pub struct FifoDrain<CLK, F, C>
where
    C: SamplerConfig,
{
    clock: CLK,
    fifo: F,
    state: DrainState,
    previous: Option<Timestamp>,
    open: Option<BlockStamps>,
    stats: DrainStats,
    _config: PhantomData<C>,
}

impl<CLK, F, C> core::fmt::Debug for FifoDrain<CLK, F, C>
where
    C: SamplerConfig,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FifoDrain")
            .field("state", &self.state)
            .field("previous", &self.previous)
            .field("open", &self.open)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<CLK, F, C> FifoDrain<CLK, F, C>
where
    CLK: Clock,
    C: SamplerConfig,
{
    const VALID_DEPTH: () = assert!(
        C::SAMPLES_PER_FIFO > 0 && C::SAMPLES_PER_FIFO <= MAX_FIFO_DEPTH,
        "SAMPLES_PER_FIFO must be between 1 and MAX_FIFO_DEPTH"
    );

    /// Create an inactive drain loop.
    pub fn new(clock: CLK, fifo: F) -> Self {
        let () = Self::VALID_DEPTH;

        Self {
            clock,
            fifo,
            state: DrainState::Inactive,
            previous: None,
            open: None,
            stats: DrainStats::default(),
            _config: PhantomData,
        }
    }

    /// Record the current time as the previous read.
    ///
    /// Call when the FIFO is enabled (or flushed). Calling again
    /// re-baselines, e.g. after a rejected clock regression, and forgets
    /// any block still being drained.
    pub fn start(&mut self) -> Result<Timestamp, StampError> {
        let now = self.clock.now().map_err(|_| StampError::ClockFault)?;
        self.discard_open_block();
        self.previous = Some(now);
        self.state = DrainState::Active;
        log_debug!("FIFO drain started at {} ms", now.as_millis());
        Ok(now)
    }

    /// Forget the baseline. `drain_block` fails until `start` is called again.
    pub fn stop(&mut self) {
        self.discard_open_block();
        self.previous = None;
        self.state = DrainState::Inactive;
        log_debug!("FIFO drain stopped");
    }

    /// Current state.
    pub fn state(&self) -> DrainState {
        self.state
    }

    /// Timestamp the next block will be interpolated from.
    pub fn previous_read(&self) -> Option<Timestamp> {
        self.previous
    }

    /// Readings of the open block still waiting in the FIFO.
    ///
    /// Non-zero when a block was larger than one drain call or than the
    /// packet's free space; the next `drain_block` continues it.
    pub fn pending_in_block(&self) -> usize {
        self.open.as_ref().map_or(0, ExactSizeIterator::len)
    }

    /// Counters since construction.
    pub fn stats(&self) -> DrainStats {
        self.stats
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut CLK {
        &mut self.clock
    }

    /// Mutable access to the FIFO source.
    pub fn fifo_mut(&mut self) -> &mut F {
        &mut self.fifo
    }

    /// Release the collaborators.
    pub fn into_parts(self) -> (CLK, F) {
        (self.clock, self.fifo)
    }

    fn discard_open_block(&mut self) {
        if let Some(stamps) = self.open.take() {
            log_warn!("Discarding {} unread samples of the open block", stamps.len());
        }
    }

    /// Read the clock and settle the interval the next block spans.
    fn begin_block(&mut self) -> Result<(Timestamp, Timestamp), StampError> {
        let prev = self.previous.ok_or(StampError::NotStarted)?;
        let curr = self.clock.now().map_err(|_| StampError::ClockFault)?;

        if curr >= prev {
            return Ok((prev, curr));
        }

        self.stats.regressions = self.stats.regressions.saturating_add(1);
        match C::REGRESSION_POLICY {
            RegressionPolicy::Reject => {
                log_warn!(
                    "Clock went backwards ({} ms after {} ms), block rejected",
                    curr.as_millis(),
                    prev.as_millis()
                );
                Err(StampError::ClockRegression {
                    previous: prev,
                    current: curr,
                })
            }
            RegressionPolicy::Clamp => {
                log_warn!(
                    "Clock went backwards ({} ms after {} ms), clamping",
                    curr.as_millis(),
                    prev.as_millis()
                );
                Ok((prev, prev))
            }
            RegressionPolicy::Resync => {
                log_warn!(
                    "Clock went backwards ({} ms after {} ms), resyncing",
                    curr.as_millis(),
                    prev.as_millis()
                );
                Ok((curr, curr))
            }
        }
    }

    /// Fix the block size and advance the baseline.
    ///
    /// Returns `false` when the FIFO was empty and there is nothing to drain.
    fn open_block(
        &mut self,
        prev: Timestamp,
        curr: Timestamp,
        level: usize,
    ) -> Result<bool, StampError> {
        let stamps = match level {
            0 => None,
            _ => Some(interpolate_block(prev, curr, level)?),
        };

        self.previous = Some(curr);
        self.stats.blocks = self.stats.blocks.saturating_add(1);
        log_trace!(
            "Block of {} samples between {} and {} ms",
            level,
            prev.as_millis(),
            curr.as_millis()
        );

        self.open = stamps;
        Ok(self.open.is_some())
    }

    // Caller guarantees a block is open and the packet has room.
    fn take_limit<const N: usize>(&self, packet: &SamplePacket<N>) -> usize {
        self.pending_in_block()
            .min(C::SAMPLES_PER_FIFO)
            .min(packet.remaining())
    }

    /// Stamp readings taken from the open block.
    ///
    /// A short read means the FIFO held fewer readings than it reported; the
    /// rest of the block is dropped.
    fn finish_take<const N: usize>(
        &mut self,
        readings: &[AccelReading],
        requested: usize,
        packet: &mut SamplePacket<N>,
    ) -> Result<usize, StampError> {
        let Some(stamps) = self.open.as_mut() else {
            return Ok(0);
        };

        for (reading, timestamp) in readings.iter().zip(&mut *stamps) {
            packet.push(reading.stamp(timestamp))?;
        }

        let n = readings.len();
        if n < requested {
            log_warn!(
                "FIFO returned {} of {} readings, {} stamps dropped",
                n,
                requested,
                self.pending_in_block()
            );
            self.open = None;
        } else if self.pending_in_block() == 0 {
            self.open = None;
        }

        self.stats.samples = self.stats.samples.saturating_add(n as u32);
        Ok(n)
    }
}

impl<CLK, F, C> FifoDrain<CLK, F, C>
where
    CLK: Clock,
    F: FifoSource,
    C: SamplerConfig,
{
    /// Drain the FIFO into `packet`.
    ///
    /// Without an open block this reads the clock, queries the FIFO fill
    /// level and opens a block of that many readings. It then moves up to
    /// `C::SAMPLES_PER_FIFO` readings of the open block, bounded by the
    /// packet's free space. Readings left over stay in the FIFO and keep
    /// their place in the block for the next call.
    ///
    /// Returns the number of samples appended; `Ok(0)` when the FIFO was empty
    /// (the baseline still advances, since the FIFO was empty at that time).
    ///
    /// # Errors
    ///
    /// * `StampError::NotStarted` - `start()` not called
    /// * `StampError::ClockFault` - clock failed; FIFO untouched
    /// * `StampError::FifoFault` - FIFO failed; an open block is kept for the next call
    /// * `StampError::BufferFull` - packet has no free slot; clock and FIFO untouched
    /// * `StampError::ClockRegression` - with `RegressionPolicy::Reject`; FIFO untouched
    pub fn drain_block<const N: usize>(
        &mut self,
        packet: &mut SamplePacket<N>,
    ) -> Result<usize, StampError> {
        if packet.is_full() {
            return Err(StampError::BufferFull);
        }

        if self.open.is_none() {
            let (prev, curr) = self.begin_block()?;
            let level = self
                .fifo
                .fill_level()
                .map_err(|_| StampError::FifoFault)?;
            if !self.open_block(prev, curr, level)? {
                return Ok(0);
            }
        }

        let limit = self.take_limit(packet);
        let mut scratch = [AccelReading::default(); MAX_FIFO_DEPTH];
        let n = self
            .fifo
            .drain(&mut scratch[..limit])
            .map_err(|_| StampError::FifoFault)?
            .min(limit);

        self.finish_take(&scratch[..n], limit, packet)
    }

    /// Drain until the packet is full or the FIFO comes back empty.
    ///
    /// Returns the total number of samples appended. When a later drain
    /// fails after earlier ones succeeded, the short total is returned and
    /// the failing step is left for the next call, which reports its error
    /// if it persists. An error is only returned when nothing was appended.
    pub fn fill_packet<const N: usize>(
        &mut self,
        packet: &mut SamplePacket<N>,
    ) -> Result<usize, StampError> {
        let mut total = 0;
        while !packet.is_full() {
            match self.drain_block(packet) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if total == 0 => return Err(e),
                Err(_) => break,
            }
        }
        Ok(total)
    }
}

#[cfg(feature = "async")]
impl<CLK, F, C> FifoDrain<CLK, F, C>
where
    CLK: Clock,
    F: AsyncFifoSource,
    C: SamplerConfig,
{
    /// Async counterpart of [`FifoDrain::drain_block`].
    pub async fn drain_block_async<const N: usize>(
        &mut self,
        packet: &mut SamplePacket<N>,
    ) -> Result<usize, StampError> {
        if packet.is_full() {
            return Err(StampError::BufferFull);
        }

        if self.open.is_none() {
            let (prev, curr) = self.begin_block()?;
            let level = self
                .fifo
                .fill_level()
                .await
                .map_err(|_| StampError::FifoFault)?;
            if !self.open_block(prev, curr, level)? {
                return Ok(0);
            }
        }

        let limit = self.take_limit(packet);
        let mut scratch = [AccelReading::default(); MAX_FIFO_DEPTH];
        let n = self
            .fifo
            .drain(&mut scratch[..limit])
            .await
            .map_err(|_| StampError::FifoFault)?
            .min(limit);

        self.finish_take(&scratch[..n], limit, packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultConfig, MinimalConfig};

    struct StepClock {
        times: [u64; 4],
        next: usize,
    }

    impl Clock for StepClock {
        type Error = ();

        fn now(&mut self) -> Result<Timestamp, Self::Error> {
            let t = *self.times.get(self.next).ok_or(())?;
            self.next += 1;
            Ok(Timestamp::from_millis(t))
        }
    }

    /// FIFO holding `level` readings whose X axis counts up.
    struct CountFifo {
        level: usize,
        next_x: i16,
        fail_drain: bool,
    }

    impl FifoSource for CountFifo {
        type Error = ();

        fn fill_level(&mut self) -> Result<usize, Self::Error> {
            Ok(self.level)
        }

        fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error> {
            if core::mem::take(&mut self.fail_drain) {
                return Err(());
            }
            let n = out.len().min(self.level);
            for slot in &mut out[..n] {
                *slot = AccelReading::new(self.next_x, 0, 0);
                self.next_x += 1;
            }
            self.level -= n;
            Ok(n)
        }
    }

    fn clock(times: [u64; 4]) -> StepClock {
        StepClock { times, next: 0 }
    }

    fn fifo(level: usize) -> CountFifo {
        CountFifo {
            level,
            next_x: 0,
            fail_drain: false,
        }
    }

    #[test]
    fn test_drain_before_start() {
        let mut drain = FifoDrain::<_, _, DefaultConfig>::new(clock([0; 4]), fifo(32));
        let mut packet = SamplePacket::<160>::new();
        assert_eq!(drain.state(), DrainState::Inactive);
        assert_eq!(drain.drain_block(&mut packet), Err(StampError::NotStarted));
    }

    #[test]
    fn test_drain_full_block() {
        let mut drain =
            FifoDrain::<_, _, DefaultConfig>::new(clock([1000, 1320, 0, 0]), fifo(32));
        let mut packet = SamplePacket::<160>::new();

        assert_eq!(drain.start(), Ok(Timestamp::from_millis(1000)));
        assert_eq!(drain.drain_block(&mut packet), Ok(32));
        assert_eq!(packet.samples()[0].timestamp.as_millis(), 1010);
        assert_eq!(packet.samples()[31].timestamp.as_millis(), 1320);
        assert_eq!(drain.previous_read(), Some(Timestamp::from_millis(1320)));
        assert_eq!(drain.pending_in_block(), 0);
        assert_eq!(drain.stats().samples, 32);
    }

    #[test]
    fn test_regression_rejected_keeps_baseline() {
        let mut drain = FifoDrain::<_, _, DefaultConfig>::new(clock([2000, 1500, 0, 0]), fifo(32));
        let mut packet = SamplePacket::<160>::new();

        drain.start().unwrap();
        assert!(matches!(
            drain.drain_block(&mut packet),
            Err(StampError::ClockRegression { .. })
        ));
        assert!(packet.is_empty());
        assert_eq!(drain.previous_read(), Some(Timestamp::from_millis(2000)));
        assert_eq!(drain.fifo_mut().level, 32);
        assert_eq!(drain.stats().regressions, 1);
    }

    #[test]
    fn test_regression_clamped() {
        let mut drain = FifoDrain::<_, _, MinimalConfig>::new(clock([2000, 1500, 0, 0]), fifo(16));
        let mut packet = SamplePacket::<16>::new();

        drain.start().unwrap();
        assert_eq!(drain.drain_block(&mut packet), Ok(16));
        assert!(
            packet
                .samples()
                .iter()
                .all(|s| s.timestamp.as_millis() == 2000)
        );
        assert_eq!(drain.previous_read(), Some(Timestamp::from_millis(2000)));
    }

    #[test]
    fn test_full_packet_keeps_rest_of_block() {
        let mut drain = FifoDrain::<_, _, MinimalConfig>::new(clock([0, 160, 320, 480]), fifo(20));
        let mut packet = SamplePacket::<16>::new();

        // 20 readings over 0..160 ms, 8 ms apart
        drain.start().unwrap();
        assert_eq!(drain.drain_block(&mut packet), Ok(16));
        assert_eq!(packet.samples()[15].timestamp.as_millis(), 128);
        assert_eq!(drain.pending_in_block(), 4);

        assert_eq!(drain.drain_block(&mut packet), Err(StampError::BufferFull));
        assert_eq!(drain.fifo_mut().level, 4);

        let mut next = SamplePacket::<16>::new();
        assert_eq!(drain.drain_block(&mut next), Ok(4));
        let stamps: [u64; 4] = core::array::from_fn(|i| next.samples()[i].timestamp.as_millis());
        assert_eq!(stamps, [136, 144, 152, 160]);
        assert_eq!(next.samples()[0].x, 16);

        // Only the start and one block read the clock
        assert_eq!(drain.clock_mut().next, 2);
        assert_eq!(drain.previous_read(), Some(Timestamp::from_millis(160)));
    }

    #[test]
    fn test_fifo_fault_after_open_keeps_block() {
        let mut drain = FifoDrain::<_, _, DefaultConfig>::new(clock([0, 80, 0, 0]), fifo(8));
        let mut packet = SamplePacket::<160>::new();
        drain.fifo_mut().fail_drain = true;

        drain.start().unwrap();
        assert_eq!(drain.drain_block(&mut packet), Err(StampError::FifoFault));
        assert_eq!(drain.pending_in_block(), 8);

        assert_eq!(drain.drain_block(&mut packet), Ok(8));
        assert_eq!(packet.samples()[7].timestamp.as_millis(), 80);
        assert_eq!(drain.clock_mut().next, 2);
    }

    #[test]
    fn test_short_read_closes_block() {
        let mut drain = FifoDrain::<_, _, DefaultConfig>::new(clock([0, 100, 0, 0]), fifo(4));
        let mut packet = SamplePacket::<160>::new();

        drain.start().unwrap();
        drain.open_block(Timestamp::ZERO, Timestamp::from_millis(100), 10).unwrap();
        assert_eq!(drain.drain_block(&mut packet), Ok(4));
        assert_eq!(packet.samples()[3].timestamp.as_millis(), 40);
        assert_eq!(drain.pending_in_block(), 0);
    }

    #[test]
    fn test_stop_clears_baseline() {
        let mut drain = FifoDrain::<_, _, DefaultConfig>::new(clock([5, 6, 7, 8]), fifo(0));
        drain.start().unwrap();
        drain.stop();
        assert_eq!(drain.state(), DrainState::Inactive);
        assert_eq!(drain.previous_read(), None);
        assert_eq!(drain.pending_in_block(), 0);
    }
}
