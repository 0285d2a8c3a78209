//! Utilities for testing your own code without writing a [`Dut`] impl.
//!
//! The most common mistake in timing tests is generating inputs (calling an
//! RNG, allocating) inside the measured call. [`InputPair`] separates input
//! generation from measurement: inputs for a whole round are produced before
//! the first counter read, and only the operation runs in the timed window.
//!
//! # Example
//!
//! ```ignore
//! use ct_oracle::{ConstantTimeOracle, helpers::InputPair};
//!
//! let inputs = InputPair::new(
//!     || [0u8; 32],                 // class 0: fixed input
//!     || rand::random::<[u8; 32]>() // class 1: random input
//! );
//!
//! let evaluation = ConstantTimeOracle::new().test("compare", inputs, |input| {
//!     my_compare(&SECRET, input);
//! })?;
//! ```

use crate::dut::Dut;
use crate::measurement::black_box;
use crate::types::{Class, SessionRng};

/// Input generators for the two classes.
///
/// Both closures are called only while a round is being prepared, never
/// inside the timed region.
pub struct InputPair<F1, F2> {
    fixed_fn: F1,
    random_fn: F2,
}

impl<T, F1, F2> InputPair<F1, F2>
where
    F1: FnMut() -> T,
    F2: FnMut() -> T,
{
    /// Create an input pair from a class-0 and a class-1 generator.
    pub fn new(fixed: F1, random: F2) -> Self {
        Self {
            fixed_fn: fixed,
            random_fn: random,
        }
    }

    /// Generate one input of the given class.
    #[inline]
    pub fn generate(&mut self, class: Class) -> T {
        match class {
            Class::Fixed => (self.fixed_fn)(),
            Class::Random => (self.random_fn)(),
        }
    }
}

/// A named closure under test, fed by an [`InputPair`].
pub struct Operation<F1, F2, F> {
    name: String,
    inputs: InputPair<F1, F2>,
    operation: F,
}

impl<T, F1, F2, F> Operation<F1, F2, F>
where
    F1: FnMut() -> T,
    F2: FnMut() -> T,
    F: FnMut(&T),
{
    /// Wrap `operation` as a DUT.
    pub fn new(name: impl Into<String>, inputs: InputPair<F1, F2>, operation: F) -> Self {
        Self {
            name: name.into(),
            inputs,
            operation,
        }
    }
}

impl<T, F1, F2, F> Dut for Operation<F1, F2, F>
where
    F1: FnMut() -> T,
    F2: FnMut() -> T,
    F: FnMut(&T),
{
    type Input = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&mut self, class: Class, _rng: &mut SessionRng) -> T {
        self.inputs.generate(class)
    }

    #[inline]
    fn invoke(&mut self, input: &T) -> bool {
        (self.operation)(black_box(input));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_input_pair_dispatches_by_class() {
        let mut counter = 0u32;
        let mut inputs = InputPair::new(
            || 0u32,
            move || {
                counter += 1;
                counter
            },
        );
        assert_eq!(inputs.generate(Class::Fixed), 0);
        assert_eq!(inputs.generate(Class::Random), 1);
        assert_eq!(inputs.generate(Class::Random), 2);
        assert_eq!(inputs.generate(Class::Fixed), 0);
    }

    #[test]
    fn test_operation_runs_closure() {
        let mut seen = Vec::new();
        {
            let mut dut = Operation::new("record", InputPair::new(|| 1u8, || 2u8), |x: &u8| seen.push(*x));
            let mut rng = SessionRng::seed_from_u64(0);
            let a = dut.generate(Class::Fixed, &mut rng);
            let b = dut.generate(Class::Random, &mut rng);
            assert_eq!(dut.name(), "record");
            assert!(dut.invoke(&a));
            assert!(dut.invoke(&b));
            assert!(dut.teardown(&b));
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
