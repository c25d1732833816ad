//! Human-readable renderings of a sparse row array.

use std::fmt;

use crate::array::SparseRowArray;
use crate::iter::SlotIter;

/// Renders the nested form, e.g. `[absent, [], [1, null, unset]]`.
impl fmt::Display for SparseRowArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, self, self.len(), 0)
    }
}

impl SparseRowArray {
    /// Multi-line diagnostic dump: buffer occupancy followed by the nested
    /// form, showing at most `limit` rows.
    ///
    /// When there are more rows than `limit`, the first and last rows are
    /// kept and the middle is replaced by an elision marker.
    pub fn to_debug_string(&self, limit: usize) -> String {
        let stats = self.stats();
        let tail = limit.min(self.len()) / 2;
        let head = limit.min(self.len()) - tail;
        format!(
            "rows: {} (capacity {})\n\
             data: {} of {} slots ({} live, {} slack)\n\
             pad unit: {}\n\
             {}",
            stats.rows,
            stats.row_capacity,
            stats.data_len,
            stats.data_capacity,
            stats.live_slots,
            stats.slack_slots,
            self.allocator().pad_unit(),
            Truncated {
                array: self,
                head,
                tail,
            },
        )
    }
}

struct Truncated<'a> {
    array: &'a SparseRowArray,
    head: usize,
    tail: usize,
}

impl fmt::Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, self.array, self.head, self.tail)
    }
}

/// Write the first `head` and last `tail` rows, eliding whatever lies
/// between them. `head + tail` must not exceed the row count.
fn write_rows(
    f: &mut fmt::Formatter<'_>,
    array: &SparseRowArray,
    head: usize,
    tail: usize,
) -> fmt::Result {
    let len = array.len();
    let elided = len - head - tail;
    let mut rows = array.iter();

    f.write_str("[")?;
    let mut sep = "";
    for row in rows.by_ref().take(head) {
        f.write_str(sep)?;
        write_row(f, row)?;
        sep = ", ";
    }
    if elided > 0 {
        write!(f, "{sep}... {elided} more ...")?;
        sep = ", ";
    }
    for row in rows.skip(elided) {
        f.write_str(sep)?;
        write_row(f, row)?;
        sep = ", ";
    }
    f.write_str("]")
}

fn write_row(f: &mut fmt::Formatter<'_>, row: Option<SlotIter<'_>>) -> fmt::Result {
    let Some(slots) = row else {
        return f.write_str("absent");
    };
    f.write_str("[")?;
    for (i, slot) in slots.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{slot}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use ragged_core::Slot;

    use super::*;

    fn sample() -> SparseRowArray {
        let mut a = SparseRowArray::new();
        a.push_row::<u32>(None).unwrap();
        a.push_row::<u32>(Some(&[])).unwrap();
        a.push_row(Some(&[Slot::Value(1), Slot::Null, Slot::Unset]))
            .unwrap();
        a
    }

    #[test]
    fn display_nested_form() {
        assert_eq!(sample().to_string(), "[absent, [], [1, null, unset]]");
        assert_eq!(SparseRowArray::new().to_string(), "[]");
    }

    #[test]
    fn debug_string_within_limit_shows_all_rows() {
        let dump = sample().to_debug_string(10);
        assert!(dump.starts_with("rows: 3"));
        assert!(dump.contains("3 live"));
        assert!(dump.ends_with("[absent, [], [1, null, unset]]"));
    }

    #[test]
    fn debug_string_elides_middle_rows() {
        let mut a = SparseRowArray::new();
        for i in 0..10u32 {
            a.push_row(Some(&[i])).unwrap();
        }
        let dump = a.to_debug_string(3);
        assert!(dump.ends_with("[[0], [1], ... 7 more ..., [9]]"), "{dump}");
    }

    #[test]
    fn debug_string_with_zero_limit() {
        let dump = sample().to_debug_string(0);
        assert!(dump.ends_with("[... 3 more ...]"), "{dump}");
    }
}
