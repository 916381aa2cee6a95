//! Logging shims over `log` or `defmt`.
//!
//! `log` wins when both features are enabled. With neither, events compile
//! away and their arguments are only borrowed.

#![allow(unused_macros)]

macro_rules! stamp_event {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::$level!(target: "fifo_stamp::drain", $s $(, $x)*);

            #[cfg(all(feature = "defmt", not(feature = "log")))]
            ::defmt::$level!($s $(, $x)*);

            #[cfg(not(any(feature = "log", feature = "defmt")))]
            { $( let _ = &$x; )* }
        }
    };
}

/// Per-block detail.
macro_rules! log_trace {
    ($($arg:tt)*) => { stamp_event!(trace, $($arg)*) };
}

/// Drain lifecycle.
macro_rules! log_debug {
    ($($arg:tt)*) => { stamp_event!(debug, $($arg)*) };
}

/// Clock regressions and dropped samples.
macro_rules! log_warn {
    ($($arg:tt)*) => { stamp_event!(warn, $($arg)*) };
}
