//! Seeded random operation streams.
//!
//! [`OpGenerator`] draws row and slot indices mostly in range but
//! deliberately overshoots sometimes, so both the growth paths and the
//! error paths get exercised. The same seed always yields the same
//! stream.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use ragged_core::Slot;

/// One mutating operation on a sparse row array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    SetRow { row: usize, content: Option<Vec<Slot>> },
    InsertRow { row: usize, content: Option<Vec<Slot>> },
    PushRow { content: Option<Vec<Slot>> },
    DeleteRow { row: usize },
    RemoveRow { row: usize },
    PopRow,
    SetSlot { row: usize, slot: usize, value: Slot },
    PushSlot { row: usize, value: Slot },
    PopSlot { row: usize },
    InsertSlot { row: usize, slot: usize, value: Slot },
    RemoveSlot { row: usize, slot: usize },
    AddToSet { row: usize, value: Slot },
    RemoveFromSet { row: usize, value: Slot },
    Purge,
}

/// Deterministic generator of [`Op`]s.
pub struct OpGenerator {
    rng: ChaCha8Rng,
    max_row_len: usize,
    max_value: u32,
}

impl OpGenerator {
    /// Rows up to 24 slots, values below 64.
    pub fn new(seed: u64) -> Self {
        Self::with_limits(seed, 24, 64)
    }

    /// Small `max_value` makes set operations hit existing values often.
    pub fn with_limits(seed: u64, max_row_len: usize, max_value: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_row_len,
            max_value,
        }
    }

    /// Draw the next operation for an array currently holding `rows` rows.
    pub fn next_op(&mut self, rows: usize) -> Op {
        match self.rng.random_range(0..100u32) {
            0..=9 => Op::SetRow {
                row: self.row(rows, 4),
                content: self.content(),
            },
            10..=16 => Op::InsertRow {
                row: self.row(rows, 2),
                content: self.content(),
            },
            17..=26 => Op::PushRow {
                content: self.content(),
            },
            27..=31 => Op::DeleteRow {
                row: self.row(rows, 1),
            },
            32..=37 => Op::RemoveRow {
                row: self.row(rows, 1),
            },
            38..=40 => Op::PopRow,
            41..=48 => Op::SetSlot {
                row: self.row(rows, 1),
                slot: self.slot(),
                value: self.value(),
            },
            49..=62 => Op::PushSlot {
                row: self.row(rows, 1),
                value: self.value(),
            },
            63..=68 => Op::PopSlot {
                row: self.row(rows, 1),
            },
            69..=78 => Op::InsertSlot {
                row: self.row(rows, 1),
                slot: self.slot(),
                value: self.value(),
            },
            79..=86 => Op::RemoveSlot {
                row: self.row(rows, 1),
                slot: self.slot(),
            },
            87..=92 => Op::AddToSet {
                row: self.row(rows, 1),
                value: self.value(),
            },
            93..=97 => Op::RemoveFromSet {
                row: self.row(rows, 1),
                value: self.value(),
            },
            _ => Op::Purge,
        }
    }

    /// A row index in `0..rows + overshoot`.
    fn row(&mut self, rows: usize, overshoot: usize) -> usize {
        self.rng.random_range(0..rows + overshoot)
    }

    fn slot(&mut self) -> usize {
        self.rng.random_range(0..=self.max_row_len)
    }

    fn value(&mut self) -> Slot {
        match self.rng.random_range(0..20u32) {
            0 => Slot::Null,
            1 => Slot::Unset,
            _ => Slot::Value(self.rng.random_range(0..self.max_value)),
        }
    }

    fn content(&mut self) -> Option<Vec<Slot>> {
        if self.rng.random_bool(0.15) {
            return None;
        }
        let len = self.rng.random_range(0..=self.max_row_len);
        Some((0..len).map(|_| self.value()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = OpGenerator::new(7);
        let mut b = OpGenerator::new(7);
        for rows in 0..200 {
            assert_eq!(a.next_op(rows % 17), b.next_op(rows % 17));
        }
    }

    #[test]
    fn row_indices_stay_near_range() {
        let mut g = OpGenerator::new(1);
        for _ in 0..500 {
            match g.next_op(3) {
                Op::SetRow { row, .. } => assert!(row < 7),
                Op::DeleteRow { row } | Op::PopSlot { row } => assert!(row < 4),
                _ => {}
            }
        }
    }
}
