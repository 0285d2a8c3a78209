//! Common types shared across the harness.

use serde::{Deserialize, Serialize};

/// Random source used for class schedules and input generation.
pub type SessionRng = rand_xoshiro::Xoshiro256PlusPlus;

/// Input class identifier for timing measurements.
///
/// The test probes whether execution time correlates with this label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// Class 0: the fixed (typically degenerate) input.
    Fixed,
    /// Class 1: randomized inputs.
    Random,
}

impl Class {
    /// Both classes, in index order.
    pub const ALL: [Class; 2] = [Class::Fixed, Class::Random];

    /// Numeric label (0 or 1) used for per-class statistics and logs.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Class::Fixed => 0,
            Class::Random => 1,
        }
    }
}

/// Outcome of evaluating the statistics after a round.
///
/// Operational failures are not a verdict; they surface as
/// [`crate::HarnessError::DutFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The strongest t-statistic crossed the leakage threshold.
    LeakageFound,
    /// Enough samples and no t-statistic crossed the threshold.
    NoLeakageEvidenceYet,
    /// Not enough samples yet; another round is needed.
    NotEnoughMeasure,
}

impl Verdict {
    /// Whether the session is over.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::NotEnoughMeasure)
    }
}
