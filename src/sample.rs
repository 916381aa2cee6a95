//! Accelerometer readings and timestamped samples.
//!
//! Axis values are fixed point, scaled by 1000 (milli-g). A reading becomes a
//! sample only when the interpolator assigns it a timestamp; samples other
//! than the last in a FIFO block never coincide with a clock read.

use crate::time::Timestamp;

/// Raw X/Y/Z reading as drained from the FIFO (value * 1000).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelReading {
    /// X axis * 1000
    pub x: i16,
    /// Y axis * 1000
    pub y: i16,
    /// Z axis * 1000
    pub z: i16,
}

impl AccelReading {
    /// Create a reading from scaled axis values.
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Attach an interpolated timestamp.
    pub fn stamp(self, timestamp: Timestamp) -> AccelSample {
        AccelSample {
            x: self.x,
            y: self.y,
            z: self.z,
            #[cfg(feature = "magnitude")]
            magnitude: self.magnitude(),
            timestamp,
        }
    }

    /// `sqrt(x^2 + y^2 + z^2)` in the same scale, saturated to `i16::MAX`.
    #[cfg(feature = "magnitude")]
    pub fn magnitude(&self) -> i16 {
        let x = f32::from(self.x);
        let y = f32::from(self.y);
        let z = f32::from(self.z);
        let m = libm::roundf(libm::sqrtf(x * x + y * y + z * z));
        if m >= f32::from(i16::MAX) {
            i16::MAX
        } else {
            m as i16
        }
    }
}

/// Accelerometer sample with its assigned timestamp.
///
/// Not mutated after interpolation; fields are public for downstream
/// formatting only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccelSample {
    /// X axis * 1000
    pub x: i16,
    /// Y axis * 1000
    pub y: i16,
    /// Z axis * 1000
    pub z: i16,
    /// Vector magnitude * 1000
    #[cfg(feature = "magnitude")]
    pub magnitude: i16,
    /// Interpolated sample time
    pub timestamp: Timestamp,
}

impl AccelSample {
    /// Axis values without the timestamp.
    pub fn reading(&self) -> AccelReading {
        AccelReading::new(self.x, self.y, self.z)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AccelSample {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "AccelSample(x={}, y={}, z={}, t={})",
            self.x,
            self.y,
            self.z,
            self.timestamp.as_millis()
        )
    }
}
