//! Per-sample timestamp interpolation for FIFO blocks.
//!
//! A FIFO read is stamped once, but holds `N` samples taken since the previous
//! read. Each sample gets a share of the interval between the two read
//! timestamps, proportional to its position in the block:
//!
//! ```text
//! prev                                          curr
//!  |-----------|-----------|-----------|-----------|
//!             s0          s1          s2          s3      (N = 4)
//! ```
//!
//! Sample `k` lands at the *end* of its slice (`k + 1` slices past `prev`), so
//! the last sample in the block maps to `curr` and none maps to `prev`.
//!
//! All arithmetic is fixed point: both timestamps are scaled by 1000 before
//! the division and the result is rounded half-up back to milliseconds. The
//! intermediates are `u128` so no `u64` input can overflow.

use crate::error::StampError;
use crate::time::Timestamp;

/// Sub-millisecond scale carried through the division.
const SCALE: u128 = 1000;

/// Half of `SCALE`, added before the final division to round half-up.
const HALF_SCALE: u128 = SCALE / 2;

/// Timestamp for the sample at `offset` in a FIFO block of
/// `fifo_sample_count` samples read at `curr`, the previous read being at
/// `prev`.
///
/// # Errors
///
/// * `StampError::ZeroSampleCount` - `fifo_sample_count == 0`
/// * `StampError::OffsetOutOfRange` - `offset >= fifo_sample_count`
/// * `StampError::ClockRegression` - `curr < prev`
///
/// # Example
///
/// ```
/// use fifo_stamp::{interpolate, Timestamp};
///
/// let prev = Timestamp::from_millis(1000);
/// let curr = Timestamp::from_millis(1320);
///
/// assert_eq!(interpolate(prev, curr, 0, 32).unwrap().as_millis(), 1010);
/// assert_eq!(interpolate(prev, curr, 31, 32).unwrap().as_millis(), 1320);
/// ```
pub fn interpolate(
    prev: Timestamp,
    curr: Timestamp,
    offset: usize,
    fifo_sample_count: usize,
) -> Result<Timestamp, StampError> {
    let block = interpolate_block(prev, curr, fifo_sample_count)?;
    block.at(offset)
}

/// Timestamps for every sample of one FIFO block, in offset order.
///
/// Arguments are validated once; iteration cannot fail.
///
/// # Errors
///
/// Same as [`interpolate`], minus the offset check.
pub fn interpolate_block(
    prev: Timestamp,
    curr: Timestamp,
    fifo_sample_count: usize,
) -> Result<BlockStamps, StampError> {
    BlockStamps::new(prev, curr, fifo_sample_count)
}

/// Iterator over the interpolated timestamps of a FIFO block.
#[derive(Debug, Clone)]
pub struct BlockStamps {
    scaled_prev: u128,
    scaled_span: u128,
    count: usize,
    next: usize,
}

impl BlockStamps {
    /// Validate the read boundaries and sample count of a block.
    pub fn new(
        prev: Timestamp,
        curr: Timestamp,
        fifo_sample_count: usize,
    ) -> Result<Self, StampError> {
        if fifo_sample_count == 0 {
            return Err(StampError::ZeroSampleCount);
        }

        if curr < prev {
            return Err(StampError::ClockRegression {
                previous: prev,
                current: curr,
            });
        }

        let scaled_prev = u128::from(prev.as_millis()) * SCALE;
        let scaled_curr = u128::from(curr.as_millis()) * SCALE;

        Ok(Self {
            scaled_prev,
            scaled_span: scaled_curr - scaled_prev,
            count: fifo_sample_count,
            next: 0,
        })
    }

    /// Number of samples in the block.
    pub fn sample_count(&self) -> usize {
        self.count
    }

    /// Timestamp of the sample at `offset`, independent of iteration position.
    pub fn at(&self, offset: usize) -> Result<Timestamp, StampError> {
        if offset >= self.count {
            return Err(StampError::OffsetOutOfRange {
                offset,
                count: self.count,
            });
        }
        Ok(self.stamp(offset))
    }

    // Caller guarantees offset < count.
    fn stamp(&self, offset: usize) -> Timestamp {
        let scaled_offset_time = self.scaled_span * (offset as u128 + 1) / self.count as u128;
        let adjusted = self.scaled_prev + scaled_offset_time;
        let rounded = (adjusted + HALF_SCALE) / SCALE;

        // adjusted <= scaled_curr, so rounded <= curr and fits in u64
        Timestamp::from_millis(rounded as u64)
    }
}

impl Iterator for BlockStamps {
    type Item = Timestamp;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let ts = self.stamp(self.next);
        self.next += 1;
        Some(ts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BlockStamps {}

impl core::iter::FusedIterator for BlockStamps {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_full_fifo_block() {
        assert_eq!(interpolate(ms(1000), ms(1320), 0, 32), Ok(ms(1010)));
        assert_eq!(interpolate(ms(1000), ms(1320), 15, 32), Ok(ms(1160)));
        assert_eq!(interpolate(ms(1000), ms(1320), 31, 32), Ok(ms(1320)));
    }

    #[test]
    fn test_last_sample_lands_on_read_time() {
        assert_eq!(interpolate(ms(1000), ms(2000), 3, 4), Ok(ms(2000)));
        assert_eq!(interpolate(ms(1000), ms(2000), 0, 4), Ok(ms(1250)));
        assert_eq!(interpolate(ms(1000), ms(1001), 2, 3), Ok(ms(1001)));
    }

    #[test]
    fn test_rounds_half_up() {
        // 1000 + 10 * 1/4 = 1002.5
        assert_eq!(interpolate(ms(1000), ms(1010), 0, 4), Ok(ms(1003)));
        // 1000 + 10 * 1/3 = 1003.333
        assert_eq!(interpolate(ms(1000), ms(1010), 0, 3), Ok(ms(1003)));
        // 1000 + 10 * 2/3 = 1006.666
        assert_eq!(interpolate(ms(1000), ms(1010), 1, 3), Ok(ms(1007)));
    }

    #[test]
    fn test_equal_boundaries() {
        for offset in 0..32 {
            assert_eq!(interpolate(ms(5000), ms(5000), offset, 32), Ok(ms(5000)));
        }
    }

    #[test]
    fn test_single_sample_block() {
        assert_eq!(interpolate(ms(10), ms(99), 0, 1), Ok(ms(99)));
    }

    #[test]
    fn test_zero_count_rejected() {
        assert_eq!(
            interpolate(ms(1000), ms(2000), 0, 0),
            Err(StampError::ZeroSampleCount)
        );
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(
            interpolate(ms(1000), ms(2000), 4, 4),
            Err(StampError::OffsetOutOfRange {
                offset: 4,
                count: 4
            })
        );
    }

    #[test]
    fn test_clock_regression_rejected() {
        assert_eq!(
            interpolate(ms(2000), ms(1999), 0, 4),
            Err(StampError::ClockRegression {
                previous: ms(2000),
                current: ms(1999),
            })
        );
    }

    #[test]
    fn test_no_overflow_near_u64_max() {
        let curr = ms(u64::MAX);
        let prev = ms(u64::MAX - 320);
        assert_eq!(interpolate(prev, curr, 31, 32), Ok(curr));
        assert_eq!(interpolate(prev, curr, 0, 32), Ok(ms(u64::MAX - 310)));
        assert_eq!(interpolate(ms(0), curr, 31, 32), Ok(curr));
    }

    #[test]
    fn test_block_iterator_matches_interpolate() {
        let block = interpolate_block(ms(1000), ms(1320), 32).unwrap();
        assert_eq!(block.len(), 32);

        for (offset, ts) in block.enumerate() {
            assert_eq!(Ok(ts), interpolate(ms(1000), ms(1320), offset, 32));
        }
    }

    #[test]
    fn test_block_iterator_non_decreasing() {
        let mut last = ms(0);
        for ts in interpolate_block(ms(7), ms(20), 32).unwrap() {
            assert!(ts >= last);
            assert!(ts >= ms(7) && ts <= ms(20));
            last = ts;
        }
        assert_eq!(last, ms(20));
    }

    #[test]
    fn test_block_at() {
        let block = interpolate_block(ms(0), ms(100), 10).unwrap();
        assert_eq!(block.sample_count(), 10);
        assert_eq!(block.at(4), Ok(ms(50)));
        assert!(block.at(10).is_err());
    }
}
