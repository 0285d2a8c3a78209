//! Simulated clock and DUTs with a known cost per class.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use ct_oracle::{Class, CycleTimer, Dut, SessionRng};
use rand::Rng;

/// A tick source that only moves when a DUT advances it.
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn starting_at(ticks: u64) -> Self {
        Self(Rc::new(Cell::new(ticks)))
    }

    pub fn advance(&self, ticks: u64) {
        self.0.set(self.0.get().wrapping_add(ticks));
    }
}

impl CycleTimer for SimClock {
    fn read(&self) -> u64 {
        self.0.get()
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Busy work whose cost depends only on the class plus seeded noise.
pub struct CostDut {
    clock: SimClock,
    cost: [u64; 2],
    noise: u64,
    calls: usize,
    fail_on_call: Option<usize>,
    reject_teardown_on_call: Option<usize>,
}

impl CostDut {
    pub fn new(clock: &SimClock, fixed_cost: u64, random_cost: u64, noise: u64) -> Self {
        Self {
            clock: clock.clone(),
            cost: [fixed_cost, random_cost],
            noise,
            calls: 0,
            fail_on_call: None,
            reject_teardown_on_call: None,
        }
    }

    /// Report failure on the n-th invocation (1-based).
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Let the n-th call (1-based) succeed but fail its after-call check.
    pub fn rejecting_teardown_on_call(mut self, n: usize) -> Self {
        self.reject_teardown_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Dut for CostDut {
    type Input = u64;

    fn name(&self) -> &str {
        "simulated"
    }

    fn generate(&mut self, class: Class, rng: &mut SessionRng) -> u64 {
        self.cost[class.index()] + rng.random_range(0..=self.noise)
    }

    fn invoke(&mut self, ticks: &u64) -> bool {
        self.calls += 1;
        self.clock.advance(*ticks);
        self.fail_on_call != Some(self.calls)
    }

    fn teardown(&mut self, _ticks: &u64) -> bool {
        self.reject_teardown_on_call != Some(self.calls)
    }
}
