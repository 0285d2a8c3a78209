//! The battery of percentile-cropped t-tests.
//!
//! Context `N_THRESHOLDS` sees every valid sample. Context `k` additionally
//! sees a sample only when it is faster than crop threshold `k`. Membership is
//! cumulative: a fast sample counts toward many crop levels at once.

use crate::constants::N_THRESHOLDS;
use crate::measurement::Thresholds;
use crate::types::Class;

use super::ttest::TContext;

/// Index of the uncropped context.
pub const UNCROPPED: usize = N_THRESHOLDS;

/// Counts from pushing one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushStats {
    /// Samples with a positive delta, pushed to the uncropped context.
    pub valid: u64,
    /// Samples with a non-positive delta, discarded as noise.
    pub dropped: u64,
}

/// `N_THRESHOLDS + 1` independent t-test contexts.
#[derive(Debug, Clone)]
pub struct CropAccumulator {
    contexts: Vec<TContext>,
}

impl Default for CropAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl CropAccumulator {
    /// Create empty contexts.
    pub fn new() -> Self {
        Self {
            contexts: vec![TContext::new(); N_THRESHOLDS + 1],
        }
    }

    /// All contexts; the last one is uncropped.
    pub fn contexts(&self) -> &[TContext] {
        &self.contexts
    }

    /// The uncropped context.
    pub fn uncropped(&self) -> &TContext {
        &self.contexts[UNCROPPED]
    }

    /// Push one post-calibration round.
    ///
    /// Non-positive deltas (counter wrap, preemption) are skipped.
    pub fn push_round(&mut self, classes: &[Class], deltas: &[i64], thresholds: &Thresholds) -> PushStats {
        debug_assert_eq!(classes.len(), deltas.len());
        debug_assert_eq!(thresholds.len(), N_THRESHOLDS);

        let mut stats = PushStats::default();
        for (&class, &delta) in classes.iter().zip(deltas) {
            if delta <= 0 {
                stats.dropped += 1;
                continue;
            }
            stats.valid += 1;

            let x = delta as f64;
            self.contexts[UNCROPPED].push(x, class);
            for (ctx, &cut) in self.contexts[..N_THRESHOLDS].iter_mut().zip(thresholds.as_slice()) {
                if delta < cut {
                    ctx.push(x, class);
                }
            }
        }
        stats
    }
}
