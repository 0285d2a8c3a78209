//! Fixed parameters of the leakage test.

/// Number of percentile crop levels. One extra context holds the uncropped data.
pub const N_THRESHOLDS: usize = 100;

/// Minimum samples a context needs before its t-statistic is trusted.
pub const ENOUGH_MEASURE: usize = 10_000;

/// Independent sessions attempted per DUT before giving up.
pub const TEST_TRIES: usize = 10;

/// Default samples per measurement round.
pub const N_MEASURES: usize = 150;

/// Default number of unmeasured positions at each end of a round.
pub const DROP_SIZE: usize = 20;

/// |t| above this: leaky with overwhelming probability.
pub const T_THRESHOLD_BANANAS: f64 = 500.0;

/// |t| above this: leaky.
pub const T_THRESHOLD_MODERATE: f64 = 10.0;
