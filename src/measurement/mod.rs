//! Measurement infrastructure.
//!
//! This module provides:
//! - Serialized cycle-counter reads behind the [`CycleTimer`] trait
//! - Round collection with shuffled balanced class schedules
//! - Differencing of counter reads into signed deltas
//! - Percentile crop thresholds from a calibration round
//!
//! # Timer Selection
//!
//! [`CpuCycles`] reads the platform counter:
//! - **x86_64**: `rdtsc` instruction
//! - **aarch64**: `cntvct_el0` virtual timer (resolution varies by SoC)
//!
//! Any other monotonic source can be plugged in by implementing
//! [`CycleTimer`]; the test suite uses a simulated clock this way.

mod collector;
mod outlier;
mod timer;

pub use collector::{differentiate, Collector, InvocationFailed, Round};
pub use outlier::{crop_fraction, percentile_rank, prepare_percentiles, Thresholds};
pub use timer::{black_box, rdtsc, CpuCycles, CycleTimer};
pub(crate) use timer::elapsed_secs;
