//! Error types for the harness.

use std::io;
use std::path::PathBuf;

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A round must hold at least two samples.
    #[error("n_measures must be at least 2, got {0}")]
    TooFewMeasures(usize),

    /// Dropping both ends would leave nothing to measure.
    #[error("drop_size {drop_size} leaves no measured samples in a round of {n_measures}")]
    DropTooLarge {
        /// Configured drop size.
        drop_size: usize,
        /// Configured round size.
        n_measures: usize,
    },

    /// At least one session is required.
    #[error("test_tries must be at least 1")]
    NoTries,
}

/// Fatal harness failure.
///
/// Any of these aborts the whole DUT evaluation.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The DUT could not execute or produced a wrong result, so the
    /// measurement infrastructure itself is broken.
    #[error("{dut}: invocation failed at sample {index} of round {round} (session {session})")]
    DutFailed {
        /// Name of the device under test.
        dut: String,
        /// Zero-based session index.
        session: usize,
        /// Zero-based round index within the session.
        round: usize,
        /// Sample position within the round.
        index: usize,
    },

    /// The diagnostic log could not be written.
    #[error("failed to write measurement log {}: {source}", path.display())]
    LogIo {
        /// Log location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Unusable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
