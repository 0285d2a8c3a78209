//! Configuration for leakage evaluation.

use std::env;
use std::path::PathBuf;

use crate::constants::{DROP_SIZE, ENOUGH_MEASURE, N_MEASURES, TEST_TRIES};
use crate::error::ConfigError;

/// Configuration options for `ConstantTimeOracle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Samples per measurement round (default: 150).
    pub n_measures: usize,

    /// Unmeasured positions at each end of a round (default: 20).
    ///
    /// Their delta is zero, so they only take part in calibration sorting.
    pub drop_size: usize,

    /// Independent sessions attempted before declaring a leak (default: 10).
    pub test_tries: usize,

    /// Samples a context needs before its verdict counts (default: 10,000).
    pub enough_measure: usize,

    /// Optional deterministic seed for class schedules and inputs.
    pub seed: Option<u64>,

    /// Optional per-sample diagnostic log (`<class> <delta>` per line).
    pub log_path: Option<PathBuf>,

    /// Optional guardrail on rounds per session.
    pub max_rounds: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_measures: N_MEASURES,
            drop_size: DROP_SIZE,
            test_tries: TEST_TRIES,
            enough_measure: ENOUGH_MEASURE,
            seed: None,
            log_path: None,
            max_rounds: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `CT_*` environment variables.
    ///
    /// Recognized: `CT_MEASURES`, `CT_DROP`, `CT_TRIES`, `CT_ENOUGH`,
    /// `CT_SEED`, `CT_LOG`, `CT_MAX_ROUNDS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Apply `CT_*` environment overrides on top of `self`.
    pub fn merge_env(mut self) -> Self {
        if let Some(n) = parse_env("CT_MEASURES") {
            self.n_measures = n;
        }
        if let Some(n) = parse_env("CT_DROP") {
            self.drop_size = n;
        }
        if let Some(n) = parse_env("CT_TRIES") {
            self.test_tries = n;
        }
        if let Some(n) = parse_env("CT_ENOUGH") {
            self.enough_measure = n;
        }
        if let Some(seed) = parse_env("CT_SEED") {
            self.seed = Some(seed);
        }
        if let Ok(path) = env::var("CT_LOG") {
            if !path.is_empty() {
                self.log_path = Some(PathBuf::from(path));
            }
        }
        if let Some(n) = parse_env("CT_MAX_ROUNDS") {
            self.max_rounds = Some(n);
        }
        self
    }

    /// Check that the settings can drive a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_measures < 2 {
            return Err(ConfigError::TooFewMeasures(self.n_measures));
        }
        if self.drop_size.saturating_mul(2) >= self.n_measures {
            return Err(ConfigError::DropTooLarge {
                drop_size: self.drop_size,
                n_measures: self.n_measures,
            });
        }
        if self.test_tries == 0 {
            return Err(ConfigError::NoTries);
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}
