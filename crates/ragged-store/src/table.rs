//! Per-row metadata tables: row start offsets and row length codes.
//!
//! Both tables hold `rows + 1` entries. The extra trailing entry is the
//! dummy row: in the [`IndexTable`] it is the data high-water mark, in the
//! [`LengthTable`] it is always absent.

use ragged_core::RowState;

use crate::flat::FlatBuffer;

/// Start offset of every row in the data buffer, plus the end sentinel.
///
/// Row `i` owns data positions `start(i)..start(i + 1)`; the difference is
/// its space (logical length plus slack).
#[derive(Clone, Debug)]
pub struct IndexTable {
    offsets: FlatBuffer,
}

impl IndexTable {
    /// Create a table holding only the dummy entry, pointing at offset 0.
    pub fn new(row_capacity: usize, growth_step: usize) -> Self {
        let mut offsets = FlatBuffer::new("index", row_capacity + 1, growth_step);
        offsets.push(0);
        Self { offsets }
    }

    /// Ensure room for `rows_needed` more entries.
    pub fn grow(&mut self, rows_needed: usize) -> bool {
        self.offsets.grow(rows_needed)
    }

    /// Data offset where row `row` starts.
    #[inline]
    pub fn start(&self, row: usize) -> usize {
        self.offsets.get(row) as usize
    }

    /// Overwrite the start offset of `row`.
    pub fn set_start(&mut self, row: usize, offset: usize) {
        self.offsets.set(row, to_offset(offset));
    }

    /// Space owned by `row`.
    #[inline]
    pub fn space(&self, row: usize) -> usize {
        self.start(row + 1) - self.start(row)
    }

    /// Append `count` entries, all pointing at `offset`.
    pub fn push_n(&mut self, count: usize, offset: usize) {
        self.offsets.push_n(count, to_offset(offset));
    }

    /// Duplicate the entry at `row`, shifting it and everything after it
    /// one place right.
    pub fn open(&mut self, row: usize) {
        let offset = self.offsets.get(row);
        self.offsets.insert(row, offset);
    }

    /// Drop the entry at `row`, shifting everything after it one place left.
    pub fn close(&mut self, row: usize) {
        self.offsets.remove(row);
    }

    /// Add `delta` to every entry from `row` through the dummy.
    pub fn shift_from(&mut self, row: usize, delta: usize) {
        if delta > 0 {
            self.offsets.add_from(row, to_offset(delta));
        }
    }

    /// Keep only the first `entries` entries.
    pub fn truncate(&mut self, entries: usize) {
        if entries < self.offsets.len() {
            self.offsets.set_len(entries);
        }
    }

    /// Number of entries, including the dummy.
    pub fn entries(&self) -> usize {
        self.offsets.len()
    }

    /// Allocated capacity in entries.
    pub fn capacity(&self) -> usize {
        self.offsets.capacity()
    }

    /// Number of reallocations performed so far.
    pub fn growths(&self) -> u64 {
        self.offsets.growths()
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.offsets.memory_bytes()
    }
}

/// Length code of every row, plus the always-absent dummy.
///
/// Code `0` marks an absent row, `1` a present empty row, and `n + 1` a
/// row holding `n` slots.
#[derive(Clone, Debug)]
pub struct LengthTable {
    codes: FlatBuffer,
}

const ABSENT: u32 = 0;

impl LengthTable {
    /// Create a table holding only the absent dummy entry.
    pub fn new(row_capacity: usize, growth_step: usize) -> Self {
        let mut codes = FlatBuffer::new("length", row_capacity + 1, growth_step);
        codes.push(ABSENT);
        Self { codes }
    }

    /// Ensure room for `rows_needed` more entries.
    pub fn grow(&mut self, rows_needed: usize) -> bool {
        self.codes.grow(rows_needed)
    }

    /// State of `row`.
    pub fn state(&self, row: usize) -> RowState {
        match self.codes.get(row) {
            0 => RowState::Absent,
            1 => RowState::Empty,
            code => RowState::Filled(code as usize - 1),
        }
    }

    /// Logical length of `row`; 0 when absent.
    #[inline]
    pub fn row_length(&self, row: usize) -> usize {
        (self.codes.get(row) as usize).saturating_sub(1)
    }

    /// Mark `row` present with `len` slots.
    ///
    /// # Panics
    ///
    /// Panics if `len + 1` does not fit in 32 bits.
    pub fn set_row_length(&mut self, row: usize, len: usize) {
        let code = u32::try_from(len + 1).expect("row length exceeds 32-bit length code");
        self.codes.set(row, code);
    }

    /// Mark `row` absent.
    pub fn set_row_absent(&mut self, row: usize) {
        self.codes.set(row, ABSENT);
    }

    /// Append `count` absent entries.
    pub fn push_absent(&mut self, count: usize) {
        self.codes.push_n(count, ABSENT);
    }

    /// Insert an absent entry at `row`, shifting the rest right.
    pub fn open(&mut self, row: usize) {
        self.codes.insert(row, ABSENT);
    }

    /// Drop the entry at `row`, shifting the rest left.
    pub fn close(&mut self, row: usize) {
        self.codes.remove(row);
    }

    /// Keep only the first `entries` entries.
    pub fn truncate(&mut self, entries: usize) {
        if entries < self.codes.len() {
            self.codes.set_len(entries);
        }
    }

    /// Sum of the logical lengths of the first `rows` rows.
    pub fn total_length(&self, rows: usize) -> usize {
        self.codes.as_slice()[..rows]
            .iter()
            .map(|&c| (c as usize).saturating_sub(1))
            .sum()
    }

    /// Number of entries, including the dummy.
    pub fn entries(&self) -> usize {
        self.codes.len()
    }

    /// Allocated capacity in entries.
    pub fn capacity(&self) -> usize {
        self.codes.capacity()
    }

    /// Number of reallocations performed so far.
    pub fn growths(&self) -> u64 {
        self.codes.growths()
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.codes.memory_bytes()
    }
}

/// Narrow a data offset to its stored width.
///
/// Callers check data capacity before writing, so this cannot fail.
fn to_offset(offset: usize) -> u32 {
    u32::try_from(offset).expect("data offset exceeds 32-bit index range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_index_has_dummy_at_zero() {
        let index = IndexTable::new(4, 4);
        assert_eq!(index.entries(), 1);
        assert_eq!(index.start(0), 0);
    }

    #[test]
    fn space_is_gap_between_starts() {
        let mut index = IndexTable::new(4, 4);
        index.push_n(1, 16);
        index.push_n(1, 20);
        assert_eq!(index.space(0), 16);
        assert_eq!(index.space(1), 4);
    }

    #[test]
    fn open_duplicates_and_shift_from_offsets() {
        let mut index = IndexTable::new(4, 4);
        index.push_n(1, 16);
        index.push_n(1, 32);
        // [0, 16, 32] -> open row 1 -> [0, 16, 16, 32] -> shift from 2 by 8.
        index.open(1);
        index.shift_from(2, 8);
        assert_eq!(
            (0..index.entries()).map(|r| index.start(r)).collect::<Vec<_>>(),
            vec![0, 16, 24, 40]
        );
    }

    #[test]
    fn close_merges_space_into_predecessor() {
        let mut index = IndexTable::new(4, 4);
        index.push_n(1, 16);
        index.push_n(1, 32);
        index.push_n(1, 48);
        index.close(2);
        assert_eq!(index.entries(), 3);
        assert_eq!(index.space(1), 32);
    }

    #[test]
    fn length_codes() {
        let mut lengths = LengthTable::new(4, 4);
        lengths.push_absent(3);
        lengths.set_row_length(0, 0);
        lengths.set_row_length(1, 5);
        assert_eq!(lengths.state(0), RowState::Empty);
        assert_eq!(lengths.state(1), RowState::Filled(5));
        assert_eq!(lengths.state(2), RowState::Absent);
        assert_eq!(lengths.row_length(0), 0);
        assert_eq!(lengths.row_length(1), 5);
        assert_eq!(lengths.row_length(2), 0);
        assert_eq!(lengths.total_length(3), 5);
        lengths.set_row_absent(1);
        assert_eq!(lengths.state(1), RowState::Absent);
    }

    #[test]
    fn length_open_inserts_absent() {
        let mut lengths = LengthTable::new(1, 1);
        lengths.set_row_length(0, 2);
        lengths.push_absent(1);
        lengths.open(0);
        assert_eq!(lengths.state(0), RowState::Absent);
        assert_eq!(lengths.state(1), RowState::Filled(2));
        lengths.close(0);
        assert_eq!(lengths.state(0), RowState::Filled(2));
        assert_eq!(lengths.entries(), 2);
    }

    #[test]
    fn tables_grow_by_row_step() {
        let mut lengths = LengthTable::new(0, 3);
        assert_eq!(lengths.capacity(), 1);
        lengths.push_absent(2);
        assert_eq!(lengths.capacity(), 4);
        assert_eq!(lengths.growths(), 1);
    }
}
