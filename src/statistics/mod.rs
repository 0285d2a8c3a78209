//! Statistical methods for leakage detection.
//!
//! This module provides the core statistical infrastructure:
//! - Online Welch's t-test contexts using Welford's update
//! - The percentile-cropped battery of `N_THRESHOLDS + 1` contexts

mod crop;
mod ttest;

pub use crop::{CropAccumulator, PushStats, UNCROPPED};
pub use ttest::TContext;
