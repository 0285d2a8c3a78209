//! Devices under test.
//!
//! A DUT is anything implementing [`Dut`]: it produces an input for a given
//! class and performs one operation per sample. Only [`Dut::invoke`] runs
//! between the two counter reads; [`Dut::setup`] and [`Dut::teardown`] bracket
//! it outside the timed window.
//!
//! [`DutKind`] enumerates the built-in queue operations. Adding a new built-in
//! DUT means writing its input generator and adding an enum entry; the harness
//! needs no change.

mod queue;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Class, SessionRng};

pub use queue::{QueueDut, QueueInput, MAX_PREFILL};

/// An operation checked for input-class-independent execution time.
pub trait Dut {
    /// Per-sample input, generated before the round is measured.
    type Input;

    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Produce the input for one sample of the given class.
    fn generate(&mut self, class: Class, rng: &mut SessionRng) -> Self::Input;

    /// Prepare state for one call. Not timed.
    fn setup(&mut self, _input: &Self::Input) {}

    /// The timed operation. Returns `false` if the call failed.
    fn invoke(&mut self, input: &Self::Input) -> bool;

    /// Verify the call's effect and release per-sample state. Not timed.
    ///
    /// Returning `false` means the measurement infrastructure is broken.
    fn teardown(&mut self, _input: &Self::Input) -> bool {
        true
    }
}

impl<D: Dut + ?Sized> Dut for &mut D {
    type Input = D::Input;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&mut self, class: Class, rng: &mut SessionRng) -> Self::Input {
        (**self).generate(class, rng)
    }

    fn setup(&mut self, input: &Self::Input) {
        (**self).setup(input)
    }

    #[inline]
    fn invoke(&mut self, input: &Self::Input) -> bool {
        (**self).invoke(input)
    }

    fn teardown(&mut self, input: &Self::Input) -> bool {
        (**self).teardown(input)
    }
}

/// Registered queue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutKind {
    /// Insert an element at the head of the queue.
    InsertHead,
    /// Insert an element at the tail of the queue.
    InsertTail,
    /// Remove the head element.
    RemoveHead,
    /// Remove the tail element.
    RemoveTail,
}

impl DutKind {
    /// Every registered operation.
    pub const ALL: [DutKind; 4] = [
        DutKind::InsertHead,
        DutKind::InsertTail,
        DutKind::RemoveHead,
        DutKind::RemoveTail,
    ];

    /// Operation name, e.g. `insert_head`.
    pub fn name(self) -> &'static str {
        match self {
            DutKind::InsertHead => "insert_head",
            DutKind::InsertTail => "insert_tail",
            DutKind::RemoveHead => "remove_head",
            DutKind::RemoveTail => "remove_tail",
        }
    }

    /// Whether the operation removes an element.
    pub fn is_remove(self) -> bool {
        matches!(self, DutKind::RemoveHead | DutKind::RemoveTail)
    }

    /// Build a fresh DUT for this operation.
    pub fn build(self) -> QueueDut {
        QueueDut::new(self)
    }
}

impl fmt::Display for DutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing an unknown DUT name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation `{0}` (expected one of insert_head, insert_tail, remove_head, remove_tail)")]
pub struct UnknownDut(pub String);

impl FromStr for DutKind {
    type Err = UnknownDut;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        DutKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownDut(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dut_kind_names_round_trip() {
        for kind in DutKind::ALL {
            assert_eq!(kind.name().parse::<DutKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!("Insert-Head".parse::<DutKind>(), Ok(DutKind::InsertHead));
    }

    #[test]
    fn test_dut_kind_unknown() {
        let err = "pop".parse::<DutKind>().unwrap_err();
        assert_eq!(err, UnknownDut("pop".to_string()));
    }

    #[test]
    fn test_remove_kinds() {
        assert!(!DutKind::InsertHead.is_remove());
        assert!(!DutKind::InsertTail.is_remove());
        assert!(DutKind::RemoveHead.is_remove());
        assert!(DutKind::RemoveTail.is_remove());
    }
}
