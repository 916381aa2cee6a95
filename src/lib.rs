//! # fifo-stamp
//!
//! Per-sample timestamps for accelerometers that are drained from a hardware
//! FIFO and stamped only once per read.
//!
//! **Key features:**
//! - **Fixed-point interpolation** - Integer-only math, rounded to the nearest millisecond
//! - **Checked preconditions** - Zero counts, bad offsets and clock regression are errors, not traps
//! - **Static allocation** - Sample packets and formatted strings live in `heapless` buffers
//! - **Flexible collaborators** - Platform-agnostic clock and FIFO traits
//!
//! ## Optional Features
//!
//! - `log` - Drain loop events through the `log` facade (default)
//! - `defmt` - Same events through `defmt` when `log` is disabled
//! - `magnitude` - Store the vector magnitude alongside each sample
//! - `async` - Async FIFO source support
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

#[macro_use]
mod fmt;

// ============================================================================
// Module Declarations
// ============================================================================

// Foundation
pub mod config;
pub mod error;
pub mod time;

// Core algorithm
pub mod interpolate;

// Leaf utilities
pub mod format;
pub mod text;

// Sample model and buffering
pub mod packet;
pub mod sample;

// Collaborators and orchestration
pub mod clock;
pub mod drain;
pub mod fifo;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{DefaultConfig, MinimalConfig, RegressionPolicy, SamplerConfig};

// Error types
pub use error::StampError;

// Core types
pub use interpolate::{BlockStamps, interpolate, interpolate_block};
pub use time::Timestamp;

// Utilities
pub use format::{Digits, Elapsed, SecondsTenths};
pub use text::{copy_text, safe_copy};

// Samples
pub use packet::SamplePacket;
pub use sample::{AccelReading, AccelSample};

// Collaborators
pub use clock::Clock;
pub use drain::{DrainState, DrainStats, FifoDrain};
pub use fifo::FifoSource;

#[cfg(feature = "async")]
pub use fifo::AsyncFifoSource;

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
