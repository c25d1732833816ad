//! The public sparse row container.
//!
//! [`SparseRowArray`] owns a [`RowAllocator`] and exposes bounds-checked
//! row-level and slot-level operations on top of it. Slots are encoded at
//! the data buffer boundary; callers only ever see [`Slot`] values.
//!
//! # Indexing policy
//!
//! Reads and slot-level operations reject row indices at or beyond
//! [`len()`](SparseRowArray::len) with [`RowError::RowOutOfRange`].
//! Row-level *writes* (`set_row`, `insert_row`) past the end instead grow
//! the container, filling the gap with absent rows. Deletes past the end
//! are no-ops.

use smallvec::SmallVec;

use ragged_core::{Row, RowError, RowState, Slot};

use crate::allocator::RowAllocator;
use crate::config::{ConfigError, StoreConfig};
use crate::data::encode;
use crate::iter::{Rows, SlotIter};
use crate::stats::StoreStats;

/// Encoded slots staged before a write, so encoding errors surface
/// before anything is touched.
type Codes = SmallVec<[u32; 16]>;

fn encode_all<S: Copy + Into<Slot>>(slots: &[S]) -> Result<Codes, RowError> {
    slots.iter().map(|&s| encode(s.into())).collect()
}

/// A sparse, growable collection of variable-length integer rows.
///
/// Rows live back to back in one flat data buffer, each followed by
/// padding slack, so pushing into a row is usually a single write. Any
/// row may be absent (a hole), present but empty, or hold slots.
///
/// `Clone` produces a fully independent deep copy.
///
/// ```
/// use ragged_core::Slot;
/// use ragged_store::SparseRowArray;
///
/// let mut rows = SparseRowArray::new();
/// rows.set_row(2, Some(&[111u32, 222, 333])).unwrap();
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows.get_row(0).unwrap(), None);
///
/// rows.push_slot(2, 444u32).unwrap();
/// assert_eq!(rows.get_slot(2, 3).unwrap(), Slot::Value(444));
/// assert_eq!(rows.to_string(), "[absent, absent, [111, 222, 333, 444]]");
/// ```
#[derive(Clone, Debug)]
pub struct SparseRowArray {
    alloc: RowAllocator,
}

impl SparseRowArray {
    /// Default padding unit, in slots.
    pub const PAD_UNIT: usize = StoreConfig::DEFAULT_PAD_UNIT;

    /// Default data buffer growth block, in slots.
    pub const DATA_GROWTH_STEP: usize = StoreConfig::DEFAULT_DATA_GROWTH_STEP;

    /// Default index/length table growth block, in rows.
    pub const ROW_GROWTH_STEP: usize = StoreConfig::DEFAULT_ROW_GROWTH_STEP;

    /// Create an empty array with the default configuration.
    pub fn new() -> Self {
        Self {
            alloc: RowAllocator::new(&StoreConfig::default()),
        }
    }

    /// Create an empty array with a custom configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            alloc: RowAllocator::new(&config),
        })
    }

    /// Build an array from a nested structure, `None` marking absent rows.
    pub fn from_nested<I, R, S>(rows: I) -> Result<Self, RowError>
    where
        I: IntoIterator<Item = Option<R>>,
        R: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        let mut array = Self::new();
        for row in rows {
            let content: Option<Row> = row.map(|slots| slots.into_iter().map(Into::into).collect());
            array.push_row(content.as_deref())?;
        }
        Ok(array)
    }

    // ── Container ──────────────────────────────────────────────────

    /// Number of rows, absent ones included.
    pub fn len(&self) -> usize {
        self.alloc.rows()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.alloc.rows() == 0
    }

    /// Remove every row. Allocated capacity is kept.
    pub fn clear(&mut self) {
        self.alloc.clear();
    }

    /// Compact the data buffer, discarding slack left behind by deletes,
    /// removes, and stretches. Returns the number of slots reclaimed.
    ///
    /// Never changes logical content.
    pub fn purge(&mut self) -> usize {
        self.alloc.purge()
    }

    /// The underlying allocator, for inspection.
    pub fn allocator(&self) -> &RowAllocator {
        &self.alloc
    }

    /// Occupancy and operation counters.
    pub fn stats(&self) -> StoreStats {
        let counters = self.alloc.counters();
        let data_len = self.alloc.data_end();
        let live_slots = self.alloc.live_slots();
        StoreStats {
            rows: self.alloc.rows(),
            data_len,
            data_capacity: self.alloc.data().capacity(),
            row_capacity: self.alloc.index().capacity(),
            live_slots,
            slack_slots: data_len - live_slots,
            memory_bytes: self.alloc.memory_bytes(),
            stretches: counters.stretches,
            row_gaps_opened: counters.row_gaps_opened,
            row_gaps_closed: counters.row_gaps_closed,
            purges: counters.purges,
            reclaimed_slots: counters.reclaimed_slots,
            buffer_growths: self.alloc.buffer_growths(),
        }
    }

    // ── Rows ───────────────────────────────────────────────────────

    /// Overwrite row `row` with `content`, or mark it absent with `None`.
    ///
    /// Writing past the end grows the array; rows in the gap are absent.
    /// An existing row is rewritten in place, stretching its space only
    /// when the new content does not fit its slack.
    pub fn set_row<S: Copy + Into<Slot>>(
        &mut self,
        row: usize,
        content: Option<&[S]>,
    ) -> Result<(), RowError> {
        if row >= self.len() {
            self.alloc.ensure_row_index(row)?;
        }
        let Some(slots) = content else {
            if row < self.len() {
                self.delete_row(row);
            } else {
                self.alloc.extend_rows(row + 1);
            }
            return Ok(());
        };
        let codes = encode_all(slots)?;
        if row < self.len() {
            self.reserve(row, codes.len())?;
        } else {
            let space = self.alloc.required_space(codes.len());
            self.alloc.ensure_capacity(space)?;
            self.alloc.extend_rows(row);
            self.alloc.append_row(space);
        }
        self.write_row(row, &codes);
        Ok(())
    }

    /// Read row `row`: `None` if absent, otherwise its slots.
    pub fn get_row(&self, row: usize) -> Result<Option<Row>, RowError> {
        self.check_row(row)?;
        Ok(self.read_row(row))
    }

    /// Insert a row before `row`, shifting later rows down one place.
    ///
    /// `row == len()` appends; `row > len()` behaves like
    /// [`set_row`](Self::set_row).
    pub fn insert_row<S: Copy + Into<Slot>>(
        &mut self,
        row: usize,
        content: Option<&[S]>,
    ) -> Result<(), RowError> {
        if row > self.len() {
            return self.set_row(row, content);
        }
        if row == self.len() {
            return self.push_row(content).map(|_| ());
        }
        self.alloc.ensure_row_index(self.len())?;
        match content {
            None => self.alloc.insert_row_gap(row, 0),
            Some(slots) => {
                let codes = encode_all(slots)?;
                let space = self.alloc.required_space(codes.len());
                self.alloc.ensure_capacity(space)?;
                self.alloc.insert_row_gap(row, space);
                self.write_row(row, &codes);
            }
        }
        Ok(())
    }

    /// Append a row and return the new number of rows.
    pub fn push_row<S: Copy + Into<Slot>>(
        &mut self,
        content: Option<&[S]>,
    ) -> Result<usize, RowError> {
        self.set_row(self.len(), content)?;
        Ok(self.len())
    }

    /// Mark row `row` absent in place. Its space is kept as slack.
    ///
    /// Does nothing if `row >= len()`.
    pub fn delete_row(&mut self, row: usize) {
        if row < self.len() {
            self.clear_row_data(row);
            self.alloc.lengths_mut().set_row_absent(row);
        }
    }

    /// Splice row `row` out, shifting later rows up one place, and return
    /// its former content (`None` if it was absent).
    ///
    /// Its data is not compacted until the next [`purge`](Self::purge).
    /// Does nothing and returns `None` if `row >= len()`.
    pub fn remove_row(&mut self, row: usize) -> Option<Row> {
        if row >= self.len() {
            return None;
        }
        if row == self.len() - 1 {
            return self.pop_row();
        }
        let removed = self.read_row(row);
        self.clear_row_data(row);
        self.alloc.remove_row_gap(row);
        removed
    }

    /// Remove the last row and return its content.
    ///
    /// Returns `None` when the row was absent or the array is empty.
    pub fn pop_row(&mut self) -> Option<Row> {
        if self.is_empty() {
            return None;
        }
        let removed = self.read_row(self.len() - 1);
        self.alloc.truncate_last();
        removed
    }

    /// Logical length of row `row`; 0 if absent or out of range.
    pub fn row_length(&self, row: usize) -> usize {
        if row >= self.len() {
            return 0;
        }
        self.alloc.row_length(row)
    }

    /// State of row `row`.
    pub fn row_state(&self, row: usize) -> Result<RowState, RowError> {
        self.check_row(row)?;
        Ok(self.alloc.state(row))
    }

    // ── Slots ──────────────────────────────────────────────────────

    /// Read slot `slot` of row `row`.
    pub fn get_slot(&self, row: usize, slot: usize) -> Result<Slot, RowError> {
        let pos = self.slot_position(row, slot)?;
        Ok(self.alloc.data().read(pos))
    }

    /// Overwrite slot `slot` of row `row`.
    pub fn set_slot(
        &mut self,
        row: usize,
        slot: usize,
        value: impl Into<Slot>,
    ) -> Result<(), RowError> {
        let pos = self.slot_position(row, slot)?;
        let code = encode(value.into())?;
        self.alloc.data_mut().write_code(pos, code);
        Ok(())
    }

    /// Append a slot to row `row` and return the row's new length.
    ///
    /// An absent row becomes present.
    pub fn push_slot(&mut self, row: usize, value: impl Into<Slot>) -> Result<usize, RowError> {
        self.check_row(row)?;
        let code = encode(value.into())?;
        let len = self.alloc.row_length(row);
        self.reserve(row, len + 1)?;
        let start = self.alloc.row_start(row);
        self.alloc.data_mut().write_code(start + len, code);
        self.alloc.lengths_mut().set_row_length(row, len + 1);
        Ok(len + 1)
    }

    /// Remove and return the last slot of row `row`.
    ///
    /// Returns [`Slot::Unset`] if the row holds no slots.
    pub fn pop_slot(&mut self, row: usize) -> Result<Slot, RowError> {
        self.check_row(row)?;
        let state = self.alloc.state(row);
        if state.is_empty() {
            return Ok(Slot::Unset);
        }
        let len = state.len();
        let pos = self.alloc.row_start(row) + len - 1;
        let value = self.alloc.data().read(pos);
        self.alloc.data_mut().clear(pos, 1);
        self.alloc.lengths_mut().set_row_length(row, len - 1);
        Ok(value)
    }

    /// Insert a slot before position `slot` of row `row` and return the
    /// row's new length. `slot == row_length(row)` appends.
    pub fn insert_slot(
        &mut self,
        row: usize,
        slot: usize,
        value: impl Into<Slot>,
    ) -> Result<usize, RowError> {
        self.check_row(row)?;
        let len = self.alloc.row_length(row);
        if slot > len {
            return Err(RowError::SlotOutOfRange { row, slot, len });
        }
        if slot == len {
            return self.push_slot(row, value);
        }
        let code = encode(value.into())?;
        self.reserve(row, len + 1)?;
        let pos = self.alloc.row_start(row) + slot;
        let data = self.alloc.data_mut();
        data.shift_range(pos, pos + 1, len - slot);
        data.write_code(pos, code);
        self.alloc.lengths_mut().set_row_length(row, len + 1);
        Ok(len + 1)
    }

    /// Remove and return slot `slot` of row `row`, closing the gap.
    pub fn remove_slot(&mut self, row: usize, slot: usize) -> Result<Slot, RowError> {
        let pos = self.slot_position(row, slot)?;
        let len = self.alloc.row_length(row);
        if slot == len - 1 {
            return self.pop_slot(row);
        }
        let data = self.alloc.data_mut();
        let value = data.read(pos);
        data.shift_range(pos + 1, pos, len - slot - 1);
        data.clear(pos + len - slot - 1, 1);
        self.alloc.lengths_mut().set_row_length(row, len - 1);
        Ok(value)
    }

    /// Position of the first slot in row `row` equal to `value`.
    pub fn index_of_slot(
        &self,
        row: usize,
        value: impl Into<Slot>,
    ) -> Result<Option<usize>, RowError> {
        self.check_row(row)?;
        // An unencodable value can never have been stored.
        let Ok(code) = encode(value.into()) else {
            return Ok(None);
        };
        let start = self.alloc.row_start(row);
        let len = self.alloc.row_length(row);
        Ok(self.alloc.data().position(start, len, code))
    }

    /// Whether row `row` holds a slot equal to `value`.
    pub fn has_slot(&self, row: usize, value: impl Into<Slot>) -> Result<bool, RowError> {
        Ok(self.index_of_slot(row, value)?.is_some())
    }

    /// Append `value` to row `row` unless already present. Returns whether
    /// it was added.
    pub fn add_to_set(&mut self, row: usize, value: impl Into<Slot>) -> Result<bool, RowError> {
        let value = value.into();
        if self.has_slot(row, value)? {
            return Ok(false);
        }
        self.push_slot(row, value)?;
        Ok(true)
    }

    /// Remove the first occurrence of `value` from row `row`, if any.
    /// Returns whether something was removed.
    pub fn remove_from_set(
        &mut self,
        row: usize,
        value: impl Into<Slot>,
    ) -> Result<bool, RowError> {
        match self.index_of_slot(row, value)? {
            Some(slot) => {
                self.remove_slot(row, slot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Views ──────────────────────────────────────────────────────

    /// Borrow row `row` as a decoding iterator, `None` if absent.
    ///
    /// The view borrows the array, so it cannot outlive the next
    /// mutating call.
    pub fn iter_row(&self, row: usize) -> Result<Option<SlotIter<'_>>, RowError> {
        self.check_row(row)?;
        Ok(self.row_view(row))
    }

    /// Iterate over every row, `None` for absent rows.
    pub fn iter(&self) -> Rows<'_> {
        Rows::new(self)
    }

    /// Materialize the whole array as a nested structure.
    pub fn to_nested(&self) -> Vec<Option<Row>> {
        self.iter().map(|row| row.map(Iterator::collect)).collect()
    }

    // ── Internals ──────────────────────────────────────────────────

    pub(crate) fn row_view(&self, row: usize) -> Option<SlotIter<'_>> {
        if !self.alloc.state(row).is_present() {
            return None;
        }
        let start = self.alloc.row_start(row);
        let len = self.alloc.row_length(row);
        Some(SlotIter::new(self.alloc.data().codes(start, len)))
    }

    fn read_row(&self, row: usize) -> Option<Row> {
        self.row_view(row).map(Iterator::collect)
    }

    fn check_row(&self, row: usize) -> Result<(), RowError> {
        if row >= self.len() {
            return Err(RowError::RowOutOfRange {
                row,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn slot_position(&self, row: usize, slot: usize) -> Result<usize, RowError> {
        self.check_row(row)?;
        let len = self.alloc.row_length(row);
        if slot >= len {
            return Err(RowError::SlotOutOfRange { row, slot, len });
        }
        Ok(self.alloc.row_start(row) + slot)
    }

    /// Make room for `len` slots in `row`, stretching if its slack is short.
    fn reserve(&mut self, row: usize, len: usize) -> Result<(), RowError> {
        let space = self.alloc.space(row);
        if len > space {
            let new_space = self.alloc.required_space(len);
            self.alloc.ensure_capacity(new_space - space)?;
            self.alloc.stretch(row, new_space);
        }
        Ok(())
    }

    /// Reset the logical content of `row` to slack before it is abandoned.
    fn clear_row_data(&mut self, row: usize) {
        let start = self.alloc.row_start(row);
        let len = self.alloc.row_length(row);
        self.alloc.data_mut().clear(start, len);
    }

    fn write_row(&mut self, row: usize, codes: &[u32]) {
        let start = self.alloc.row_start(row);
        let old_len = self.alloc.row_length(row);
        let data = self.alloc.data_mut();
        data.write_codes(start, codes);
        if old_len > codes.len() {
            data.clear(start + codes.len(), old_len - codes.len());
        }
        self.alloc.lengths_mut().set_row_length(row, codes.len());
    }
}

impl Default for SparseRowArray {
    fn default() -> Self {
        Self::new()
    }
}

/// Arrays are equal when their nested forms are; slack layout is ignored.
impl PartialEq for SparseRowArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|pair| match pair {
                (None, None) => true,
                (Some(a), Some(b)) => a.eq(b),
                _ => false,
            })
    }
}

impl Eq for SparseRowArray {}

impl<'a> IntoIterator for &'a SparseRowArray {
    type Item = Option<SlotIter<'a>>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Rows<'a> {
        self.iter()
    }
}
