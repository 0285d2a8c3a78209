//! Evaluation result types.

use serde::{Deserialize, Serialize};

use crate::types::Verdict;

/// Complete result of evaluating one DUT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Name of the device under test.
    pub dut: String,

    /// Whether some session reached `NoLeakageEvidenceYet`.
    ///
    /// This is evidence, not proof: the test can miss rare or weak leaks.
    pub constant_time: bool,

    /// One entry per attempted session, in order.
    pub sessions: Vec<SessionReport>,

    /// Metadata for debugging.
    pub metadata: Metadata,
}

impl Evaluation {
    /// Verdict of the last attempted session.
    pub fn final_verdict(&self) -> Option<Verdict> {
        self.sessions.last().map(|s| s.verdict)
    }

    /// Number of sessions that found leakage.
    pub fn leaky_sessions(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.verdict == Verdict::LeakageFound)
            .count()
    }

    /// Largest winning |t| over all sessions.
    pub fn max_t(&self) -> f64 {
        self.sessions.iter().map(|s| s.max_t).fold(0.0, f64::max)
    }
}

/// Summary of one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionReport {
    /// Zero-based attempt index.
    pub attempt: usize,
    /// Terminal verdict, or `NotEnoughMeasure` if the round guardrail ended it.
    pub verdict: Verdict,
    /// Rounds measured, calibration included.
    pub rounds: usize,
    /// Samples pushed to the uncropped context.
    pub valid_samples: u64,
    /// Samples discarded for a non-positive delta.
    pub dropped_samples: u64,
    /// Winning context of the last decision, if any round was analyzed.
    pub context: Option<usize>,
    /// Winning |t| of the last decision.
    ///
    /// Infinite when a context has a mean difference and no variance.
    #[serde(with = "non_finite")]
    pub max_t: f64,
    /// Samples in the winning context.
    pub winning_samples: u64,
}

/// Run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Samples per round.
    pub n_measures: usize,
    /// Unmeasured positions at each end of a round.
    pub drop_size: usize,
    /// Session budget.
    pub test_tries: usize,
    /// Samples needed before a context's verdict counts.
    pub enough_measure: usize,
    /// Tick source name.
    pub timer: String,
    /// Seed used for schedules and inputs, if fixed.
    pub seed: Option<u64>,
    /// Wall-clock runtime in seconds.
    pub runtime_secs: f64,
}

/// Serde representation for statistics that may be infinite.
///
/// JSON has no infinity: finite values stay numbers, infinities and NaN are
/// written as the strings `"inf"`, `"-inf"` and `"NaN"`. A `null` (as
/// `serde_json` writes non-finite floats by default) reads back as
/// `f64::INFINITY`.
pub(crate) mod non_finite {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
        Null(()),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Null(()) => Ok(f64::INFINITY),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid statistic `{other}`"))),
            },
        }
    }
}
