//! One leakage-test session: calibrate once, then accumulate until conclusive.
//!
//! ```text
//! Calibrating --(first round: thresholds)--> Measuring
//! Measuring   --(NotEnoughMeasure)---------> Measuring
//! Measuring   --(LeakageFound | NoLeakageEvidenceYet)--> Concluded
//! ```
//!
//! A session owns its thresholds and its t-test battery. Nothing carries over
//! between sessions.

use crate::analysis::{report, Decision};
use crate::measurement::{prepare_percentiles, Thresholds};
use crate::result::SessionReport;
use crate::statistics::CropAccumulator;
use crate::types::{Class, Verdict};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the calibration round.
    Calibrating,
    /// Accumulating statistics.
    Measuring,
    /// A terminal verdict was reached.
    Concluded(Verdict),
}

#[derive(Debug, Clone)]
enum State {
    Calibrating,
    Measuring { thresholds: Thresholds },
    Concluded { thresholds: Thresholds, verdict: Verdict },
}

/// Session state machine.
#[derive(Debug, Clone)]
pub struct Session {
    enough_measure: usize,
    state: State,
    accumulator: CropAccumulator,
    rounds: usize,
    valid: u64,
    dropped: u64,
    last: Option<Decision>,
}

impl Session {
    /// Start a session that needs `enough_measure` samples to conclude.
    pub fn new(enough_measure: usize) -> Self {
        Self {
            enough_measure,
            state: State::Calibrating,
            accumulator: CropAccumulator::new(),
            rounds: 0,
            valid: 0,
            dropped: 0,
            last: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Calibrating => Phase::Calibrating,
            State::Measuring { .. } => Phase::Measuring,
            State::Concluded { verdict, .. } => Phase::Concluded(*verdict),
        }
    }

    /// Feed one measured round and return the resulting verdict.
    ///
    /// The first round only calibrates the crop thresholds and always yields
    /// `NotEnoughMeasure`. Once concluded, further rounds are ignored and the
    /// stored verdict is returned.
    pub fn observe(&mut self, classes: &[Class], deltas: &[i64]) -> Verdict {
        let state = std::mem::replace(&mut self.state, State::Calibrating);
        let (next, verdict) = match state {
            State::Calibrating => {
                self.rounds += 1;
                let thresholds = prepare_percentiles(deltas);
                (State::Measuring { thresholds }, Verdict::NotEnoughMeasure)
            }
            State::Measuring { thresholds } => {
                self.rounds += 1;
                let pushed = self.accumulator.push_round(classes, deltas, &thresholds);
                self.valid += pushed.valid;
                self.dropped += pushed.dropped;

                let decision = report(self.accumulator.contexts(), self.enough_measure);
                self.last = Some(decision);
                tracing::debug!(
                    round = self.rounds,
                    samples = self.accumulator.uncropped().total(),
                    max_t = decision.max_t(),
                    context = decision.context,
                    "round analyzed"
                );

                let verdict = decision.verdict;
                if verdict.is_terminal() {
                    (State::Concluded { thresholds, verdict }, verdict)
                } else {
                    (State::Measuring { thresholds }, verdict)
                }
            }
            concluded @ State::Concluded { verdict, .. } => (concluded, verdict),
        };
        self.state = next;
        verdict
    }

    /// Crop thresholds, once calibrated.
    pub fn thresholds(&self) -> Option<&Thresholds> {
        match &self.state {
            State::Calibrating => None,
            State::Measuring { thresholds } | State::Concluded { thresholds, .. } => Some(thresholds),
        }
    }

    /// The t-test battery.
    pub fn accumulator(&self) -> &CropAccumulator {
        &self.accumulator
    }

    /// Rounds observed, calibration included.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Valid samples pushed so far.
    pub fn valid_samples(&self) -> u64 {
        self.valid
    }

    /// Non-positive samples discarded so far.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped
    }

    /// Decision of the latest measured round.
    pub fn last_decision(&self) -> Option<&Decision> {
        self.last.as_ref()
    }

    /// Summarize the session for reporting.
    ///
    /// A session that never concluded reports `NotEnoughMeasure`.
    pub fn summary(&self, attempt: usize) -> SessionReport {
        let verdict = match self.phase() {
            Phase::Concluded(verdict) => verdict,
            Phase::Calibrating | Phase::Measuring => Verdict::NotEnoughMeasure,
        };
        SessionReport {
            attempt,
            verdict,
            rounds: self.rounds,
            valid_samples: self.valid,
            dropped_samples: self.dropped,
            context: self.last.map(|d| d.context),
            max_t: self.last.map_or(0.0, |d| d.max_t()),
            winning_samples: self.last.map_or(0, |d| d.samples),
        }
    }
}
