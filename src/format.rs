//! Human-readable timestamp formatting.
//!
//! Each format is a `Display` adaptor (zero cost, writes straight into any
//! `core::fmt::Write` sink) plus a helper that renders into a fixed-capacity
//! `heapless::String`. A string that does not fit returns
//! `StampError::BufferFull` instead of being cut short.

use crate::error::StampError;
use crate::time::Timestamp;
use core::fmt::{self, Write};

/// Capacity that fits any `Digits` rendering (`u64::MAX` has 20 digits).
pub const DIGITS_CAPACITY: usize = 20;

/// Capacity that fits any `Elapsed` rendering.
pub const ELAPSED_CAPACITY: usize = 48;

/// Capacity that fits any `SecondsTenths` rendering.
pub const SECONDS_CAPACITY: usize = 48;

const MILLIS_PER_SECOND: u64 = 1000;
const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const HOURS_PER_DAY: u64 = 24;

/// Plain digits, no separators.
///
/// Rendered as a "millions" part padded to at least three digits followed by
/// the remainder padded to six, so `5` renders as `000000005`. Either way the
/// digits parse back to the same value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Digits(pub Timestamp);

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        write!(f, "{:03}{:06}", millis / 1_000_000, millis % 1_000_000)
    }
}

/// Elapsed-time breakdown: `<days> Days plus HH:MM:SS.mmm`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Elapsed(pub Timestamp);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();

        let total_seconds = millis / MILLIS_PER_SECOND;
        let total_minutes = total_seconds / SECONDS_PER_MINUTE;
        let total_hours = total_minutes / MINUTES_PER_HOUR;
        let days = total_hours / HOURS_PER_DAY;

        write!(
            f,
            "{} Days plus {:02}:{:02}:{:02}.{:03}",
            days,
            total_hours % HOURS_PER_DAY,
            total_minutes % MINUTES_PER_HOUR,
            total_seconds % SECONDS_PER_MINUTE,
            millis % MILLIS_PER_SECOND
        )
    }
}

/// Seconds rounded to tenths, plus the raw millisecond part:
/// `<s>.<t> seconds  <ms> milliseconds`.
///
/// Tenths round half-up (`849` ms -> `.8`, `850` ms -> `.9`). At `950` ms and
/// above the tenth carries into the seconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SecondsTenths(pub Timestamp);

impl fmt::Display for SecondsTenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();

        let mut seconds = millis / MILLIS_PER_SECOND;
        let remainder = millis % MILLIS_PER_SECOND;
        let mut tenths = (remainder + 50) / 100;
        if tenths == 10 {
            seconds += 1;
            tenths = 0;
        }

        write!(
            f,
            "{}.{} seconds  {} milliseconds",
            seconds, tenths, remainder
        )
    }
}

fn render<const N: usize>(value: impl fmt::Display) -> Result<heapless::String<N>, StampError> {
    let mut out = heapless::String::new();
    write!(out, "{}", value).map_err(|_| StampError::BufferFull)?;
    Ok(out)
}

/// Render [`Digits`] into a string of capacity `N`.
pub fn digits_string<const N: usize>(ts: Timestamp) -> Result<heapless::String<N>, StampError> {
    render(Digits(ts))
}

/// Render [`Elapsed`] into a string of capacity `N`.
pub fn elapsed_string<const N: usize>(ts: Timestamp) -> Result<heapless::String<N>, StampError> {
    render(Elapsed(ts))
}

/// Render [`SecondsTenths`] into a string of capacity `N`.
pub fn seconds_string<const N: usize>(ts: Timestamp) -> Result<heapless::String<N>, StampError> {
    render(SecondsTenths(ts))
}
