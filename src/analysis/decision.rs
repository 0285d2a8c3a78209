//! Picking the strongest t-test and turning it into a verdict.

use serde::{Deserialize, Serialize};

use crate::constants::{T_THRESHOLD_BANANAS, T_THRESHOLD_MODERATE};
use crate::statistics::{TContext, UNCROPPED};
use crate::types::Verdict;

/// Verdict together with the statistic that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Outcome for this round.
    pub verdict: Verdict,
    /// Index of the winning context (`UNCROPPED` for the uncropped one).
    pub context: usize,
    /// Signed t-statistic of the winning context.
    #[serde(with = "crate::result::non_finite")]
    pub t: f64,
    /// Samples in the winning context.
    pub samples: u64,
}

impl Decision {
    /// Absolute t of the winning context.
    pub fn max_t(&self) -> f64 {
        self.t.abs()
    }
}

/// Index of the context with the largest |t| among those holding more than
/// `enough_measure` samples.
///
/// The first maximum wins; a NaN never does. Falls back to the uncropped
/// context when none qualifies.
pub fn max_test(contexts: &[TContext], enough_measure: usize) -> usize {
    let mut best = UNCROPPED;
    let mut max = 0.0;
    for (i, ctx) in contexts.iter().enumerate() {
        if ctx.total() > enough_measure as u64 {
            let x = ctx.t_compute().abs();
            if max < x {
                max = x;
                best = i;
            }
        }
    }
    best
}

/// Decide the round's verdict from the strongest context.
pub fn report(contexts: &[TContext], enough_measure: usize) -> Decision {
    let context = max_test(contexts, enough_measure);
    let winner = &contexts[context];
    let t = winner.t_compute();
    let samples = winner.total();
    let max_t = t.abs();

    let verdict = if samples < enough_measure as u64 {
        Verdict::NotEnoughMeasure
    } else if max_t > T_THRESHOLD_BANANAS {
        // Definitely not constant time
        Verdict::LeakageFound
    } else if max_t > T_THRESHOLD_MODERATE {
        // Probably not constant time
        Verdict::LeakageFound
    } else {
        Verdict::NoLeakageEvidenceYet
    };

    Decision {
        verdict,
        context,
        t,
        samples,
    }
}
