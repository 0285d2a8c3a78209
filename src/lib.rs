//! # ct-oracle
//!
//! Check whether an operation's execution time depends on its input.
//!
//! The harness runs a device under test (DUT) on two classes of inputs
//! (fixed vs random), in a shuffled order, timing every call with the CPU
//! cycle counter. Per-class running statistics feed a battery of Welch
//! t-tests, one per percentile crop level plus one over all samples, and the
//! strongest statistic decides:
//! - `LeakageFound` when |t| exceeds 10
//! - `NoLeakageEvidenceYet` once enough samples agree the classes look alike
//! - `NotEnoughMeasure` while more rounds are needed
//!
//! A leaky session is retried with fresh statistics up to `test_tries` times;
//! the DUT passes at the first session with no leakage evidence.
//!
//! ## ⚠️ Common Pitfall: Work Outside the Operation
//!
//! Everything in the timed window counts. Generate inputs in the class
//! generators, never inside the operation.
//!
//! ```ignore
//! // ❌ WRONG - the RNG runs inside the timed call
//! oracle.test("cmp", InputPair::new(|| (), || ()), |_| my_cmp(&rand::random()));
//!
//! // ✅ CORRECT - inputs are generated before the round is measured
//! oracle.test("cmp", InputPair::new(|| [0u8; 32], || rand::random()), |x| my_cmp(x));
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use ct_oracle::{is_constant_time, DutKind};
//!
//! for kind in DutKind::ALL {
//!     println!("{kind}: {}", is_constant_time(kind));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod oracle;
mod result;
mod session;
mod types;

// Functional modules
pub mod analysis;
pub mod dut;
pub mod helpers;
pub mod measurement;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use config::Config;
pub use constants::{
    DROP_SIZE, ENOUGH_MEASURE, N_MEASURES, N_THRESHOLDS, TEST_TRIES, T_THRESHOLD_BANANAS,
    T_THRESHOLD_MODERATE,
};
pub use dut::{Dut, DutKind};
pub use error::{ConfigError, HarnessError};
pub use measurement::{CpuCycles, CycleTimer};
pub use oracle::ConstantTimeOracle;
pub use result::{Evaluation, Metadata, SessionReport};
pub use session::{Phase, Session};
pub use types::{Class, SessionRng, Verdict};

// Re-export helpers for convenience
pub use helpers::InputPair;

/// Evaluate a built-in queue operation with configuration from the
/// environment.
///
/// Returns `true` if some session found no leakage evidence. A failed
/// evaluation (DUT failure, unusable configuration, log error) is logged
/// and counts as `false`.
pub fn is_constant_time(kind: DutKind) -> bool {
    match ConstantTimeOracle::from_env().evaluate(kind.build()) {
        Ok(evaluation) => evaluation.constant_time,
        Err(err) => {
            tracing::error!(dut = %kind, "evaluation failed: {err}");
            false
        }
    }
}

/// Declarative constant-time test macro.
///
/// Generates a `#[test]` that evaluates a built-in DUT with configuration
/// from the environment and fails unless it appears constant time.
///
/// ```ignore
/// ct_test!(#[ignore] insert_tail_is_constant_time => DutKind::InsertTail);
/// ```
#[macro_export]
macro_rules! ct_test {
    ($(#[$meta:meta])* $name:ident => $kind:expr $(,)?) => {
        $(#[$meta])*
        #[test]
        fn $name() {
            let evaluation = $crate::ConstantTimeOracle::from_env()
                .evaluate($kind.build())
                .unwrap_or_else(|err| panic!("{} could not be evaluated: {}", stringify!($name), err));

            assert!(
                evaluation.constant_time,
                "timing leak detected in {}: max |t| {:.2} over {} sessions",
                evaluation.dut,
                evaluation.max_t(),
                evaluation.sessions.len()
            );
        }
    };
}
