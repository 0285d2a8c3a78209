//! Linked-list queue operations as DUTs.
//!
//! Class `Fixed` runs the operation on an empty queue (one element for
//! removals); class `Random` on a queue prefilled with a random number of
//! elements. A constant-time queue operation must not care.

use std::collections::LinkedList;

use rand::Rng;

use super::{Dut, DutKind};
use crate::types::{Class, SessionRng};

/// Upper bound (exclusive) on the random prefill length.
pub const MAX_PREFILL: usize = 10_000;

/// Length of generated element strings.
const VALUE_LEN: usize = 7;

/// Input for one queue sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueInput {
    /// Elements placed in the queue before the timed call.
    pub prefill: usize,
    /// Value inserted by insert operations.
    pub value: String,
}

/// A queue of owned strings exercised by one [`DutKind`] operation.
#[derive(Debug)]
pub struct QueueDut {
    kind: DutKind,
    queue: LinkedList<String>,
    removed: Option<String>,
    size_before: usize,
}

impl QueueDut {
    /// Create a DUT for the given operation.
    pub fn new(kind: DutKind) -> Self {
        Self {
            kind,
            queue: LinkedList::new(),
            removed: None,
            size_before: 0,
        }
    }

    /// The operation under test.
    pub fn kind(&self) -> DutKind {
        self.kind
    }

    /// Current queue length.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

fn random_value(rng: &mut SessionRng) -> String {
    (0..VALUE_LEN)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

impl Dut for QueueDut {
    type Input = QueueInput;

    fn name(&self) -> &str {
        self.kind.name()
    }

    fn generate(&mut self, class: Class, rng: &mut SessionRng) -> QueueInput {
        let prefill = match class {
            Class::Fixed => 0,
            Class::Random => usize::from(rng.random::<u16>()) % MAX_PREFILL,
        };
        // Removals need something to remove.
        let prefill = if self.kind.is_remove() { prefill + 1 } else { prefill };
        QueueInput {
            prefill,
            value: random_value(rng),
        }
    }

    fn setup(&mut self, input: &QueueInput) {
        self.queue.clear();
        self.removed = None;
        for _ in 0..input.prefill {
            self.queue.push_back(input.value.clone());
        }
        self.size_before = self.queue.len();
    }

    #[inline]
    fn invoke(&mut self, input: &QueueInput) -> bool {
        match self.kind {
            DutKind::InsertHead => {
                self.queue.push_front(input.value.clone());
                true
            }
            DutKind::InsertTail => {
                self.queue.push_back(input.value.clone());
                true
            }
            DutKind::RemoveHead => {
                self.removed = self.queue.pop_front();
                self.removed.is_some()
            }
            DutKind::RemoveTail => {
                self.removed = self.queue.pop_back();
                self.removed.is_some()
            }
        }
    }

    fn teardown(&mut self, _input: &QueueInput) -> bool {
        let size_after = self.queue.len();
        let expected = if self.kind.is_remove() {
            self.size_before.checked_sub(1)
        } else {
            Some(self.size_before + 1)
        };
        self.queue.clear();
        self.removed = None;
        expected == Some(size_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SessionRng {
        SessionRng::seed_from_u64(7)
    }

    #[test]
    fn test_fixed_class_is_minimal() {
        let mut rng = rng();
        let mut insert = QueueDut::new(DutKind::InsertHead);
        let mut remove = QueueDut::new(DutKind::RemoveTail);

        assert_eq!(insert.generate(Class::Fixed, &mut rng).prefill, 0);
        assert_eq!(remove.generate(Class::Fixed, &mut rng).prefill, 1);
    }

    #[test]
    fn test_random_class_bounded() {
        let mut rng = rng();
        let mut dut = QueueDut::new(DutKind::RemoveHead);
        for _ in 0..1000 {
            let input = dut.generate(Class::Random, &mut rng);
            assert!(input.prefill >= 1 && input.prefill <= MAX_PREFILL);
            assert_eq!(input.value.len(), VALUE_LEN);
            assert!(input.value.bytes().all(|b| b.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_insert_head_places_value_first() {
        let mut dut = QueueDut::new(DutKind::InsertHead);
        let input = QueueInput { prefill: 3, value: "abcdefg".to_string() };
        dut.setup(&input);
        let marker = QueueInput { prefill: 0, value: "zzzzzzz".to_string() };
        assert!(dut.invoke(&marker));
        assert_eq!(dut.queue.front().map(String::as_str), Some("zzzzzzz"));
        assert_eq!(dut.len(), 4);
        assert!(dut.teardown(&marker));
        assert!(dut.is_empty());
    }

    #[test]
    fn test_insert_tail_places_value_last() {
        let mut dut = QueueDut::new(DutKind::InsertTail);
        assert_eq!(dut.kind(), DutKind::InsertTail);
        dut.setup(&QueueInput { prefill: 2, value: "aaaaaaa".to_string() });
        assert!(dut.invoke(&QueueInput { prefill: 0, value: "bbbbbbb".to_string() }));
        assert_eq!(dut.queue.back().map(String::as_str), Some("bbbbbbb"));
    }

    #[test]
    fn test_remove_shrinks_queue() {
        for kind in [DutKind::RemoveHead, DutKind::RemoveTail] {
            let mut dut = QueueDut::new(kind);
            let input = QueueInput { prefill: 5, value: "abcdefg".to_string() };
            dut.setup(&input);
            assert!(dut.invoke(&input));
            assert_eq!(dut.len(), 4);
            assert!(dut.teardown(&input));
        }
    }

    #[test]
    fn test_remove_from_empty_fails() {
        let mut dut = QueueDut::new(DutKind::RemoveHead);
        let input = QueueInput { prefill: 0, value: "abcdefg".to_string() };
        dut.setup(&input);
        assert!(!dut.invoke(&input));
        assert!(!dut.teardown(&input));
    }

    #[test]
    fn test_teardown_detects_missing_insert() {
        let mut dut = QueueDut::new(DutKind::InsertHead);
        let input = QueueInput { prefill: 2, value: "abcdefg".to_string() };
        dut.setup(&input);
        // Skipping invoke leaves the size unchanged.
        assert!(!dut.teardown(&input));
    }
}
