//! Row space management across the data, index, and length buffers.
//!
//! [`RowAllocator`] decides where each row lives in the data buffer and
//! keeps the three buffers consistent while rows are appended, inserted,
//! removed, stretched, and compacted. It never interprets slot contents;
//! writing slots and length codes is left to the caller.
//!
//! # Layout
//!
//! ```text
//! rows:     [  row 0   ][ row 1 (absent) ][      row 2      ]
//! data:     [a b . . . ]                  [c d e . . . . . .]
//!            ^index[0]  ^index[1]          ^index[2]         ^index[3] (dummy)
//! ```
//!
//! Each row owns `index[i]..index[i + 1]`; the part past its logical length
//! is slack. Deleting or removing a row abandons its space rather than
//! compacting; [`RowAllocator::purge`] is the only operation that gives
//! space back.

use ragged_core::{RowError, RowState};

use crate::config::StoreConfig;
use crate::data::DataBuffer;
use crate::table::{IndexTable, LengthTable};

/// Cumulative counts of the allocator's expensive operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorCounters {
    /// Rows whose space was stretched by shifting the data tail.
    pub stretches: u64,
    /// Rows inserted mid-container.
    pub row_gaps_opened: u64,
    /// Rows spliced out mid-container.
    pub row_gaps_closed: u64,
    /// Calls to [`RowAllocator::purge`].
    pub purges: u64,
    /// Data slots given back by purges.
    pub reclaimed_slots: u64,
}

/// Coordinates the three flat buffers behind a sparse row array.
#[derive(Clone, Debug)]
pub struct RowAllocator {
    data: DataBuffer,
    index: IndexTable,
    lengths: LengthTable,
    rows: usize,
    pad_unit: usize,
    counters: AllocatorCounters,
}

impl RowAllocator {
    /// Largest data length the 32-bit index table can address.
    ///
    /// One below `u32::MAX` so that a row spanning the whole buffer still
    /// has a representable length code.
    pub const MAX_DATA_LEN: usize = u32::MAX as usize - 1;

    /// Largest number of rows the index and length tables may hold.
    ///
    /// Both tables carry one entry past the last row, so the limit leaves
    /// room for it within the 32-bit entry range.
    pub const MAX_ROWS: usize = u32::MAX as usize - 1;

    /// Create an allocator with no rows.
    ///
    /// The config must already have passed [`StoreConfig::validate`].
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data: DataBuffer::new(config.initial_data_capacity, config.data_growth_step),
            index: IndexTable::new(config.initial_row_capacity, config.row_growth_step),
            lengths: LengthTable::new(config.initial_row_capacity, config.row_growth_step),
            rows: 0,
            pad_unit: config.pad_unit,
            counters: AllocatorCounters::default(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Padding unit in slots.
    pub fn pad_unit(&self) -> usize {
        self.pad_unit
    }

    /// The data high-water mark (the dummy row's start offset).
    pub fn data_end(&self) -> usize {
        self.index.start(self.rows)
    }

    /// The data buffer.
    pub fn data(&self) -> &DataBuffer {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut DataBuffer {
        &mut self.data
    }

    /// The row start table.
    pub fn index(&self) -> &IndexTable {
        &self.index
    }

    /// The row length table.
    pub fn lengths(&self) -> &LengthTable {
        &self.lengths
    }

    pub(crate) fn lengths_mut(&mut self) -> &mut LengthTable {
        &mut self.lengths
    }

    /// Cumulative operation counts.
    pub fn counters(&self) -> AllocatorCounters {
        self.counters
    }

    /// Space to reserve for a row of `len` slots: `len` rounded up to a
    /// multiple of the pad unit, and never less than one unit.
    pub fn required_space(&self, len: usize) -> usize {
        len.max(1).div_ceil(self.pad_unit) * self.pad_unit
    }

    /// Data offset where `row` starts.
    pub fn row_start(&self, row: usize) -> usize {
        self.index.start(row)
    }

    /// Space owned by `row` (logical length plus slack).
    pub fn space(&self, row: usize) -> usize {
        self.index.space(row)
    }

    /// State of `row`.
    pub fn state(&self, row: usize) -> RowState {
        self.lengths.state(row)
    }

    /// Logical length of `row`; 0 when absent.
    pub fn row_length(&self, row: usize) -> usize {
        self.lengths.row_length(row)
    }

    /// Sum of all rows' logical lengths.
    pub fn live_slots(&self) -> usize {
        self.lengths.total_length(self.rows)
    }

    /// Check that the data buffer can take `additional` more slots.
    pub fn ensure_capacity(&self, additional: usize) -> Result<(), RowError> {
        let end = self.data_end();
        match end.checked_add(additional) {
            Some(requested) if requested <= Self::MAX_DATA_LEN => Ok(()),
            requested => Err(RowError::CapacityExceeded {
                requested: requested.unwrap_or(usize::MAX),
                capacity: Self::MAX_DATA_LEN,
            }),
        }
    }

    /// Check that the tables can hold a row at index `row`, growing the
    /// row count to at least `row + 1`.
    pub fn ensure_row_index(&self, row: usize) -> Result<(), RowError> {
        match row.checked_add(1) {
            Some(requested) if requested <= Self::MAX_ROWS => Ok(()),
            requested => Err(RowError::TooManyRows {
                requested: requested.unwrap_or(usize::MAX),
                max: Self::MAX_ROWS,
            }),
        }
    }

    /// Give `row` `new_space` slots by shifting the whole data tail after
    /// it right in one move and offsetting every later index entry.
    ///
    /// The caller must have checked capacity for the difference.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range or `new_space` is not larger than
    /// the row's current space.
    pub fn stretch(&mut self, row: usize, new_space: usize) {
        assert!(row < self.rows, "stretch of row {row} past {} rows", self.rows);
        let space = self.space(row);
        assert!(
            new_space > space,
            "stretch of row {row} must grow its space ({space} -> {new_space})"
        );
        let delta = new_space - space;
        let tail = self.index.start(row + 1);
        let end = self.data_end();

        self.data.grow(delta);
        self.data.set_len(end + delta);
        self.data.shift_range(tail, tail + delta, end - tail);
        self.data.clear(tail, delta);
        self.index.shift_from(row + 1, delta);

        self.counters.stretches += 1;
        log::debug!(
            "stretched row {row} from {space} to {new_space} slots, moved {} tail slots",
            end - tail
        );
    }

    /// Append absent rows with no space until there are `rows` rows.
    /// Does nothing if there already are.
    pub fn extend_rows(&mut self, rows: usize) {
        if rows <= self.rows {
            return;
        }
        let added = rows - self.rows;
        let end = self.data_end();
        self.index.push_n(added, end);
        self.lengths.push_absent(added);
        self.rows = rows;
    }

    /// Append one absent row owning `space` fresh slack slots and return
    /// its start offset.
    ///
    /// The caller must have checked capacity for `space`.
    pub fn append_row(&mut self, space: usize) -> usize {
        let start = self.data_end();
        self.data.grow(space);
        self.data.set_len(start + space);
        self.index.push_n(1, start + space);
        self.lengths.push_absent(1);
        self.rows += 1;
        start
    }

    /// Insert an absent row at `row` owning `space` fresh slack slots.
    ///
    /// The data tail from the old row `row` onwards moves right by `space`
    /// and every later row's metadata moves down one entry.
    ///
    /// The caller must have checked capacity for `space`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`; appending goes through
    /// [`append_row`](Self::append_row).
    pub fn insert_row_gap(&mut self, row: usize, space: usize) {
        assert!(row < self.rows, "row gap at {row} past {} rows", self.rows);
        let start = self.index.start(row);
        let end = self.data_end();
        if space > 0 {
            self.data.grow(space);
            self.data.set_len(end + space);
            self.data.shift_range(start, start + space, end - start);
            self.data.clear(start, space);
        }
        self.index.open(row);
        self.index.shift_from(row + 1, space);
        self.lengths.open(row);
        self.rows += 1;

        self.counters.row_gaps_opened += 1;
        log::trace!("opened row gap at {row} with {space} slots");
    }

    /// Splice `row` out of the index and length tables.
    ///
    /// Its data is not compacted: the region becomes slack of the previous
    /// row (or leading slack if `row` is 0) until the next purge.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`.
    pub fn remove_row_gap(&mut self, row: usize) {
        assert!(row < self.rows, "row gap removal at {row} past {} rows", self.rows);
        let abandoned = self.space(row);
        self.index.close(row);
        self.lengths.close(row);
        self.rows -= 1;

        self.counters.row_gaps_closed += 1;
        log::trace!("closed row gap at {row}, abandoned {abandoned} slots");
    }

    /// Drop the last row, releasing its data back to the buffer end.
    ///
    /// # Panics
    ///
    /// Panics if there are no rows.
    pub fn truncate_last(&mut self) {
        assert!(self.rows > 0, "truncate_last on an empty allocator");
        self.rows -= 1;
        self.index.truncate(self.rows + 1);
        self.lengths.truncate(self.rows + 1);
        self.lengths.set_row_absent(self.rows);
        let end = self.data_end();
        self.data.set_len(end);
    }

    /// Drop every row. Capacity is kept.
    pub fn clear(&mut self) {
        self.rows = 0;
        self.index.truncate(1);
        self.index.set_start(0, 0);
        self.lengths.truncate(1);
        self.lengths.set_row_absent(0);
        self.data.set_len(0);
    }

    /// Compact the data buffer, returning the number of slots reclaimed.
    ///
    /// Walks rows in order and slides each row's content left to the
    /// running cursor. Present rows keep at most
    /// [`required_space`](Self::required_space) of their current space;
    /// absent rows keep none. The cursor never overtakes a row's old start,
    /// so every move is a left shift over already-consumed space.
    pub fn purge(&mut self) -> usize {
        let old_end = self.data_end();
        let mut cursor = 0;
        for row in 0..self.rows {
            let start = self.index.start(row);
            let space = self.index.space(row);
            let target = match self.lengths.state(row) {
                RowState::Absent => 0,
                state => self.required_space(state.len()).min(space),
            };
            let len = self.lengths.row_length(row);
            debug_assert!(cursor <= start, "purge cursor overtook row {row}");
            self.data.shift_range(start, cursor, len);
            self.data.clear(cursor + len, target - len);
            self.index.set_start(row, cursor);
            cursor += target;
        }
        self.index.set_start(self.rows, cursor);
        self.data.set_len(cursor);

        let reclaimed = old_end - cursor;
        self.counters.purges += 1;
        self.counters.reclaimed_slots += reclaimed as u64;
        log::debug!("purge reclaimed {reclaimed} of {old_end} data slots");
        reclaimed
    }

    /// Check the structural invariants, panicking on the first violation.
    ///
    /// Intended for tests and debug assertions.
    pub fn assert_consistent(&self) {
        assert_eq!(self.index.entries(), self.rows + 1, "index table length");
        assert_eq!(self.lengths.entries(), self.rows + 1, "length table length");
        assert_eq!(self.data_end(), self.data.len(), "dummy offset vs data length");
        assert_eq!(self.lengths.state(self.rows), RowState::Absent, "dummy row state");
        for row in 0..self.rows {
            assert!(
                self.index.start(row) <= self.index.start(row + 1),
                "negative space at row {row}"
            );
            assert!(
                self.row_length(row) <= self.space(row),
                "row {row} length {} exceeds space {}",
                self.row_length(row),
                self.space(row)
            );
        }
    }

    /// Memory usage of all three buffers in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.memory_bytes() + self.index.memory_bytes() + self.lengths.memory_bytes()
    }

    /// Total reallocations across all three buffers.
    pub fn buffer_growths(&self) -> u64 {
        self.data.growths() + self.index.growths() + self.lengths.growths()
    }
}
