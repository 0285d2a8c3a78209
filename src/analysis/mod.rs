//! Analysis module for leakage decisions.
//!
//! After every measured round the battery of t-tests is reduced to one
//! [`Decision`]: the context with the largest |t| among those with enough
//! samples, compared against the leakage thresholds.

mod decision;

pub use decision::{max_test, report, Decision};
