//! Percentile crop thresholds.
//!
//! Execution times have a fat right tail: most calls are fast, a few are
//! interrupted or miss cache and take much longer. Rather than guess one
//! cutoff, the calibration round yields `N_THRESHOLDS` cutoffs that keep
//! the fastest `1 - 0.5^(10(i+1)/N_THRESHOLDS)` fraction of samples, a
//! geometric sweep concentrated on the fast path.

use crate::constants::N_THRESHOLDS;

/// Crop cut-points computed from one calibration round.
///
/// Non-decreasing in index. Frozen for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds(Vec<i64>);

impl Thresholds {
    /// Cut-point for crop level `k`.
    pub fn get(&self, k: usize) -> i64 {
        self.0[k]
    }

    /// All cut-points.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Number of crop levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for calibrated thresholds.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fraction of the distribution kept at crop level `i`.
pub fn crop_fraction(i: usize) -> f64 {
    1.0 - 0.5f64.powf(10.0 * (i + 1) as f64 / N_THRESHOLDS as f64)
}

/// Sorted-array rank of crop level `i` in a round of `n` samples.
///
/// # Panics
///
/// Panics if the rank falls outside `[0, n)`. The formula keeps it in range
/// for any non-empty round, so this only fires on a broken invariant.
pub fn percentile_rank(n: usize, i: usize) -> usize {
    let rank = (n as f64 * crop_fraction(i)).floor() as usize;
    assert!(rank < n, "percentile rank {rank} out of range for {n} samples");
    rank
}

/// Compute crop thresholds from the raw deltas of a calibration round.
///
/// Non-positive deltas are included: calibration only needs rank order.
///
/// # Panics
///
/// Panics if `deltas` is empty.
pub fn prepare_percentiles(deltas: &[i64]) -> Thresholds {
    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let cuts = (0..N_THRESHOLDS)
        .map(|i| sorted[percentile_rank(n, i)])
        .collect();
    Thresholds(cuts)
}
