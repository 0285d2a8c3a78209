//! Round collection: input generation, timed invocation and differencing.
//!
//! Each round draws a balanced class schedule, shuffles it so class order is
//! independent of anything the DUT or the machine does, pre-generates every
//! input, and only then measures. Nothing but the DUT call sits between the
//! two counter reads.

use std::ops::Range;

use rand::seq::SliceRandom;

use crate::config::Config;
use crate::dut::Dut;
use crate::types::{Class, SessionRng};

use super::timer::{black_box, CycleTimer};

/// One measured round: class labels and raw counter reads, in schedule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    classes: Vec<Class>,
    before: Vec<u64>,
    after: Vec<u64>,
}

impl Round {
    /// Assemble a round from its parts.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    pub fn new(classes: Vec<Class>, before: Vec<u64>, after: Vec<u64>) -> Self {
        assert_eq!(classes.len(), before.len(), "classes/before length mismatch");
        assert_eq!(classes.len(), after.len(), "classes/after length mismatch");
        Self { classes, before, after }
    }

    /// Number of samples (measured or dropped).
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the round holds no samples.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class label per sample.
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// Counter reads before each call.
    pub fn before(&self) -> &[u64] {
        &self.before
    }

    /// Counter reads after each call.
    pub fn after(&self) -> &[u64] {
        &self.after
    }

    /// Per-sample execution time, see [`differentiate`].
    pub fn deltas(&self) -> Vec<i64> {
        differentiate(&self.before, &self.after)
    }
}

/// Compute `after - before` for each sample.
///
/// The subtraction wraps and is reinterpreted as signed, so a counter that
/// went backwards or wrapped yields a non-positive delta instead of a huge
/// positive one.
pub fn differentiate(before: &[u64], after: &[u64]) -> Vec<i64> {
    before
        .iter()
        .zip(after)
        .map(|(&b, &a)| a.wrapping_sub(b) as i64)
        .collect()
}

/// The DUT reported failure at this sample position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationFailed {
    /// Position within the round.
    pub index: usize,
}

/// Collector for measured rounds.
#[derive(Debug, Clone)]
pub struct Collector<T> {
    timer: T,
    n_measures: usize,
    measured: Range<usize>,
}

impl<T: CycleTimer> Collector<T> {
    /// Create a collector with explicit round geometry.
    pub fn new(timer: T, n_measures: usize, drop_size: usize) -> Self {
        Self {
            timer,
            n_measures,
            measured: drop_size..n_measures.saturating_sub(drop_size),
        }
    }

    /// Create a collector using the round geometry of `config`.
    pub fn from_config(timer: T, config: &Config) -> Self {
        Self::new(timer, config.n_measures, config.drop_size)
    }

    /// The tick source.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Samples per round.
    pub fn n_measures(&self) -> usize {
        self.n_measures
    }

    /// Positions of a round that are actually invoked and timed.
    pub fn measured_range(&self) -> Range<usize> {
        self.measured.clone()
    }

    /// Create a balanced, shuffled class schedule for one round.
    pub fn create_schedule(&self, rng: &mut SessionRng) -> Vec<Class> {
        let fixed = self.n_measures / 2;
        let mut schedule = Vec::with_capacity(self.n_measures);
        schedule.extend(std::iter::repeat(Class::Fixed).take(fixed));
        schedule.extend(std::iter::repeat(Class::Random).take(self.n_measures - fixed));
        schedule.shuffle(rng);
        schedule
    }

    /// Measure one round of `dut`.
    ///
    /// Positions inside the drop margins are generated but not invoked; their
    /// counter reads stay zero.
    pub fn collect<D: Dut>(&self, dut: &mut D, rng: &mut SessionRng) -> Result<Round, InvocationFailed> {
        let classes = self.create_schedule(rng);
        let inputs: Vec<D::Input> = classes.iter().map(|&class| dut.generate(class, rng)).collect();

        let mut before = vec![0u64; self.n_measures];
        let mut after = vec![0u64; self.n_measures];

        for index in self.measured_range() {
            let input = &inputs[index];
            dut.setup(input);

            let start = self.timer.read();
            let ok = black_box(dut.invoke(black_box(input)));
            let stop = self.timer.read();

            before[index] = start;
            after[index] = stop;

            let checked = dut.teardown(input);
            if !ok || !checked {
                return Err(InvocationFailed { index });
            }
        }

        Ok(Round::new(classes, before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::cell::Cell;

    struct StepClock(Cell<u64>);

    impl CycleTimer for StepClock {
        fn read(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 10);
            now
        }
    }

    struct CountingDut {
        calls: usize,
        fail_at: Option<usize>,
        teardowns: usize,
        reject_teardown_at: Option<usize>,
    }

    impl CountingDut {
        fn new() -> Self {
            Self {
                calls: 0,
                fail_at: None,
                teardowns: 0,
                reject_teardown_at: None,
            }
        }
    }

    impl Dut for CountingDut {
        type Input = Class;

        fn name(&self) -> &str {
            "counting"
        }

        fn generate(&mut self, class: Class, _rng: &mut SessionRng) -> Class {
            class
        }

        fn invoke(&mut self, _input: &Class) -> bool {
            self.calls += 1;
            self.fail_at != Some(self.calls)
        }

        fn teardown(&mut self, _input: &Class) -> bool {
            self.teardowns += 1;
            self.reject_teardown_at != Some(self.teardowns)
        }
    }

    fn rng() -> SessionRng {
        SessionRng::seed_from_u64(1)
    }

    #[test]
    fn test_differentiate_wraps_to_negative() {
        let before = [100, 5, u64::MAX - 1, 7];
        let after = [150, 5, 3, 2];
        assert_eq!(differentiate(&before, &after), vec![50, 0, 5, -5]);
    }

    #[test]
    fn test_schedule_balanced() {
        let collector = Collector::new(StepClock(Cell::new(0)), 101, 0);
        let schedule = collector.create_schedule(&mut rng());

        let fixed = schedule.iter().filter(|c| **c == Class::Fixed).count();
        let random = schedule.iter().filter(|c| **c == Class::Random).count();
        assert_eq!(fixed, 50);
        assert_eq!(random, 51);
    }

    #[test]
    fn test_collect_measures_inner_positions_only() {
        let collector = Collector::new(StepClock(Cell::new(1)), 20, 3);
        let mut dut = CountingDut::new();

        let round = collector.collect(&mut dut, &mut rng()).unwrap();

        assert_eq!(collector.n_measures(), 20);
        assert_eq!(collector.measured_range(), 3..17);
        assert_eq!(round.len(), 20);
        assert_eq!(dut.calls, 14);
        assert!(round.before()[..3].iter().chain(&round.after()[..3]).all(|&t| t == 0));
        assert!(round.before()[3..17].iter().all(|&t| t > 0));
        // Two reads per call, nothing else touches the clock.
        assert_eq!(collector.timer().0.get(), 1 + 14 * 20);
        let deltas = round.deltas();
        assert!(deltas[..3].iter().all(|&d| d == 0));
        assert!(deltas[17..].iter().all(|&d| d == 0));
        assert!(deltas[3..17].iter().all(|&d| d == 10));
    }

    #[test]
    fn test_collect_stops_on_failure() {
        let collector = Collector::new(StepClock(Cell::new(1)), 50, 0);
        let mut dut = CountingDut {
            fail_at: Some(7),
            ..CountingDut::new()
        };

        let err = collector.collect(&mut dut, &mut rng()).unwrap_err();

        assert_eq!(err, InvocationFailed { index: 6 });
        assert_eq!(dut.calls, 7);
    }

    #[test]
    fn test_collect_stops_on_rejected_teardown() {
        let collector = Collector::new(StepClock(Cell::new(1)), 50, 5);
        let mut dut = CountingDut {
            reject_teardown_at: Some(3),
            ..CountingDut::new()
        };

        let err = collector.collect(&mut dut, &mut rng()).unwrap_err();

        // Third measured position after a drop margin of five.
        assert_eq!(err, InvocationFailed { index: 7 });
        assert_eq!(dut.calls, 3);
        assert_eq!(dut.teardowns, 3);
    }

    #[test]
    fn test_zero_drop_measures_everything() {
        let collector = Collector::new(StepClock(Cell::new(0)), 10, 0);
        assert_eq!(collector.measured_range(), 0..10);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_round_length_mismatch_panics() {
        Round::new(vec![Class::Fixed], vec![0, 1], vec![0]);
    }
}
