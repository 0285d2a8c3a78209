//! Tests for ct_oracle::helpers utilities driven through the oracle.

mod common;

use common::SimClock;
use ct_oracle::helpers::InputPair;
use ct_oracle::{ConstantTimeOracle, Verdict};
use rand::Rng;

#[test]
fn test_operation_with_class_independent_cost() {
    let clock = SimClock::default();
    let mut rng = rand::rng();
    let inputs = InputPair::new(|| [0u8; 16], move || rng.random::<[u8; 16]>());

    let evaluation = ConstantTimeOracle::new()
        .n_measures(20_000)
        .drop_size(0)
        .seed(21)
        .timer(clock.clone())
        .test("xor_fold", inputs, |bytes| {
            // Cost depends only on the length, never the contents.
            clock.advance(100 + bytes.len() as u64);
        })
        .unwrap();

    assert_eq!(evaluation.dut, "xor_fold");
    assert!(evaluation.constant_time);
}

#[test]
fn test_operation_with_branch_on_input() {
    let clock = SimClock::default();
    let inputs = InputPair::new(|| 0u8, || 1u8);

    let evaluation = ConstantTimeOracle::new()
        .n_measures(20_000)
        .drop_size(0)
        .test_tries(2)
        .seed(22)
        .timer(clock.clone())
        .test("branch_on_zero", inputs, |&x| {
            clock.advance(if x == 0 { 100 } else { 140 });
        })
        .unwrap();

    assert!(!evaluation.constant_time);
    assert_eq!(evaluation.sessions.len(), 2);
    assert!(evaluation
        .sessions
        .iter()
        .all(|s| s.verdict == Verdict::LeakageFound));
}
