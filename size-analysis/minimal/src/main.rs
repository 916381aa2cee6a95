#![no_std]
#![no_main]

use fifo_stamp::config::MinimalConfig;
use fifo_stamp::format::{DIGITS_CAPACITY, ELAPSED_CAPACITY, digits_string, elapsed_string};
use fifo_stamp::{AccelReading, Clock, FifoDrain, FifoSource, SamplePacket, Timestamp};
use panic_halt as _;

// Minimal Clock implementation - a free-running millisecond counter
pub struct TickClock {
    ticks: u64,
}

impl Clock for TickClock {
    type Error = ();

    fn now(&mut self) -> Result<Timestamp, Self::Error> {
        self.ticks = self.ticks.wrapping_add(10);
        Ok(Timestamp::from_millis(self.ticks))
    }
}

// Minimal FifoSource implementation - measures only struct size
pub struct NullFifo;

impl FifoSource for NullFifo {
    type Error = ();

    fn fill_level(&mut self) -> Result<usize, Self::Error> {
        Ok(core::hint::black_box(16))
    }

    fn drain(&mut self, out: &mut [AccelReading]) -> Result<usize, Self::Error> {
        for slot in out.iter_mut() {
            *slot = core::hint::black_box(AccelReading::new(0, 0, 1000));
        }
        Ok(out.len())
    }
}

// Entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    let mut drain = FifoDrain::<_, _, MinimalConfig>::new(TickClock { ticks: 0 }, NullFifo);
    let mut packet = SamplePacket::<16>::new();

    // Start and drain once to ensure the interpolation path is included
    // Use black_box to prevent optimizer from removing the code
    let _ = core::hint::black_box(drain.start());
    let _ = core::hint::black_box(drain.drain_block(&mut packet));

    // Render the last sample to pull in the formatters
    if let Some(sample) = packet.samples().last() {
        let _ = core::hint::black_box(digits_string::<DIGITS_CAPACITY>(sample.timestamp));
        let _ = core::hint::black_box(elapsed_string::<ELAPSED_CAPACITY>(sample.timestamp));
    }

    // Keep state alive to prevent optimization
    loop {
        core::hint::black_box(&drain);
        core::hint::black_box(&packet);
        cortex_m::asm::nop();
    }
}

// Required: exception handler
#[cortex_m_rt::exception]
unsafe fn HardFault(_ef: &cortex_m_rt::ExceptionFrame) -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
