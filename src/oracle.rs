//! Main `ConstantTimeOracle` entry point and builder.

use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dut::Dut;
use crate::error::HarnessError;
use crate::helpers::{InputPair, Operation};
use crate::measurement::{elapsed_secs, Collector, CpuCycles, CycleTimer};
use crate::output::SampleLog;
use crate::result::{Evaluation, Metadata, SessionReport};
use crate::session::Session;
use crate::types::{SessionRng, Verdict};

/// Main entry point for leakage evaluation.
///
/// Use the builder pattern to configure, then hand it a [`Dut`].
///
/// # Example
///
/// ```ignore
/// use ct_oracle::{ConstantTimeOracle, DutKind};
///
/// let evaluation = ConstantTimeOracle::new()
///     .test_tries(5)
///     .seed(42)
///     .evaluate(DutKind::InsertTail.build())?;
///
/// assert!(evaluation.constant_time);
/// ```
///
/// The tick source defaults to the CPU cycle counter. Tests and simulations
/// can substitute any [`CycleTimer`] with [`ConstantTimeOracle::timer`].
#[derive(Debug, Clone)]
pub struct ConstantTimeOracle<T = CpuCycles> {
    config: Config,
    timer: T,
}

impl Default for ConstantTimeOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantTimeOracle {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            timer: CpuCycles,
        }
    }

    /// Create with defaults overridden by `CT_*` environment variables.
    ///
    /// See [`Config::from_env`].
    pub fn from_env() -> Self {
        Self::with_config(Config::from_env())
    }
}

impl<T: CycleTimer> ConstantTimeOracle<T> {
    /// Set samples per round.
    pub fn n_measures(mut self, n: usize) -> Self {
        self.config.n_measures = n;
        self
    }

    /// Set unmeasured positions at each end of a round.
    pub fn drop_size(mut self, n: usize) -> Self {
        self.config.drop_size = n;
        self
    }

    /// Set the number of sessions to attempt.
    pub fn test_tries(mut self, n: usize) -> Self {
        self.config.test_tries = n;
        self
    }

    /// Set the sample count a context needs before its verdict counts.
    pub fn enough_measure(mut self, n: usize) -> Self {
        self.config.enough_measure = n;
        self
    }

    /// Fix the RNG seed for reproducible schedules and inputs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Write every sample to a diagnostic log.
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = Some(path.into());
        self
    }

    /// Stop a session after this many rounds even if it has not concluded.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.config.max_rounds = Some(rounds);
        self
    }

    /// Use a different tick source.
    pub fn timer<U: CycleTimer>(self, timer: U) -> ConstantTimeOracle<U> {
        ConstantTimeOracle {
            config: self.config,
            timer,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run up to `test_tries` sessions against `dut`.
    ///
    /// Stops at the first session that ends with `NoLeakageEvidenceYet`; a
    /// session that finds leakage is followed by a fresh one until the budget
    /// is spent. A DUT failure aborts the whole evaluation.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Config`] if the configuration is unusable
    /// - [`HarnessError::DutFailed`] if the DUT reports a failed call
    /// - [`HarnessError::LogIo`] if the diagnostic log cannot be written
    pub fn evaluate<D: Dut>(&self, mut dut: D) -> Result<Evaluation, HarnessError> {
        self.config.validate()?;
        let start = Instant::now();
        let name = dut.name().to_string();

        let mut log = self.config.log_path.as_ref().map(SampleLog::create).transpose()?;
        if let Some(log) = &log {
            debug!(path = %log.path().display(), "logging samples");
        }
        let collector = Collector::from_config(&self.timer, &self.config);
        let tries = self.config.test_tries;

        let mut sessions = Vec::with_capacity(tries);
        let mut constant_time = false;
        for attempt in 0..tries {
            info!(dut = %name, "testing {} (attempt {}/{})", name, attempt + 1, tries);
            let mut rng = self.session_rng(attempt);
            let report = self.run_session(&collector, &mut dut, &mut rng, attempt, &mut log)?;
            let verdict = report.verdict;
            sessions.push(report);

            match verdict {
                Verdict::NoLeakageEvidenceYet => {
                    info!(dut = %name, attempt, "no leakage evidence, probably constant time");
                    constant_time = true;
                    break;
                }
                Verdict::LeakageFound => {
                    warn!(dut = %name, attempt, "leakage found, retrying with a fresh session")
                }
                Verdict::NotEnoughMeasure => {
                    warn!(dut = %name, attempt, "round limit reached without a verdict")
                }
            }
        }

        if let Some(log) = log.as_mut() {
            log.flush()?;
        }

        let runtime_secs = elapsed_secs(start);
        info!(
            dut = %name,
            constant_time,
            sessions = sessions.len(),
            runtime_secs,
            "evaluation finished"
        );

        Ok(Evaluation {
            dut: name,
            constant_time,
            sessions,
            metadata: Metadata {
                n_measures: self.config.n_measures,
                drop_size: self.config.drop_size,
                test_tries: tries,
                enough_measure: self.config.enough_measure,
                timer: collector.timer().name().to_string(),
                seed: self.config.seed,
                runtime_secs,
            },
        })
    }

    /// Evaluate a closure fed by an [`InputPair`].
    ///
    /// Only `operation` runs inside the timed window.
    ///
    /// # Errors
    ///
    /// See [`ConstantTimeOracle::evaluate`]. The closure itself cannot fail.
    pub fn test<I, F1, F2, F>(
        &self,
        name: &str,
        inputs: InputPair<F1, F2>,
        operation: F,
    ) -> Result<Evaluation, HarnessError>
    where
        F1: FnMut() -> I,
        F2: FnMut() -> I,
        F: FnMut(&I),
    {
        self.evaluate(Operation::new(name, inputs, operation))
    }

    fn session_rng(&self, attempt: usize) -> SessionRng {
        match self.config.seed {
            Some(seed) => SessionRng::seed_from_u64(seed.wrapping_add(attempt as u64)),
            None => SessionRng::from_rng(&mut rand::rng()),
        }
    }

    fn run_session<D: Dut>(
        &self,
        collector: &Collector<&T>,
        dut: &mut D,
        rng: &mut SessionRng,
        attempt: usize,
        log: &mut Option<SampleLog>,
    ) -> Result<SessionReport, HarnessError> {
        let mut session = Session::new(self.config.enough_measure);

        loop {
            if self.config.max_rounds.is_some_and(|max| session.rounds() >= max) {
                break;
            }

            let round = collector.collect(dut, rng).map_err(|failed| HarnessError::DutFailed {
                dut: dut.name().to_string(),
                session: attempt,
                round: session.rounds(),
                index: failed.index,
            })?;
            let deltas = round.deltas();

            if let Some(log) = log.as_mut() {
                log.write_round(round.classes(), &deltas)?;
            }

            if session.observe(round.classes(), &deltas).is_terminal() {
                break;
            }
        }

        let report = session.summary(attempt);
        debug!(
            attempt,
            verdict = ?report.verdict,
            rounds = report.rounds,
            max_t = report.max_t,
            "session concluded"
        );
        Ok(report)
    }
}
