//! Error types for sparse row storage.
//!
//! Row and slot bounds violations, unencodable values, and data or row
//! capacity exhaustion. Internal invariant violations are not represented here:
//! they are logic errors and panic.

use std::error::Error;
use std::fmt;

/// Errors returned by fallible row and slot operations.
///
/// Every check that can produce one of these runs before the first write,
/// so an `Err` always leaves the store untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowError {
    /// A row index was at or beyond the number of rows.
    RowOutOfRange {
        /// The requested row index.
        row: usize,
        /// Number of rows in the store.
        len: usize,
    },
    /// A slot index was at or beyond the row's logical length.
    SlotOutOfRange {
        /// The row being addressed.
        row: usize,
        /// The requested slot index.
        slot: usize,
        /// Logical length of the row.
        len: usize,
    },
    /// A value cannot be encoded in the 32-bit data buffer.
    ValueTooLarge {
        /// The rejected value.
        value: u32,
        /// Largest encodable value.
        max: u32,
    },
    /// The data buffer would outgrow the 32-bit offset space.
    CapacityExceeded {
        /// Data length (in slots) the operation needed.
        requested: usize,
        /// Largest data length the index table can address.
        capacity: usize,
    },
    /// A row-level write would grow the store past its row limit.
    TooManyRows {
        /// Row count the operation needed (`usize::MAX` if it overflowed).
        requested: usize,
        /// Largest row count the index and length tables can hold.
        max: usize,
    },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row, len } => {
                write!(f, "row index {row} out of range for {len} rows")
            }
            Self::SlotOutOfRange { row, slot, len } => {
                write!(
                    f,
                    "slot index {slot} out of range for row {row} of length {len}"
                )
            }
            Self::ValueTooLarge { value, max } => {
                write!(f, "value {value} exceeds maximum storable value {max}")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "data capacity exceeded: requested {requested} slots, capacity {capacity} slots"
                )
            }
            Self::TooManyRows { requested, max } => {
                write!(f, "row limit exceeded: requested {requested} rows, limit {max} rows")
            }
        }
    }
}

impl Error for RowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_row_out_of_range() {
        let e = RowError::RowOutOfRange { row: 5, len: 3 };
        assert_eq!(e.to_string(), "row index 5 out of range for 3 rows");
    }

    #[test]
    fn display_slot_out_of_range() {
        let e = RowError::SlotOutOfRange {
            row: 1,
            slot: 4,
            len: 2,
        };
        assert_eq!(
            e.to_string(),
            "slot index 4 out of range for row 1 of length 2"
        );
    }

    #[test]
    fn display_too_many_rows() {
        let e = RowError::TooManyRows {
            requested: usize::MAX,
            max: 10,
        };
        assert_eq!(
            e.to_string(),
            format!("row limit exceeded: requested {} rows, limit 10 rows", usize::MAX)
        );
    }

    #[test]
    fn errors_are_std_errors() {
        let e: Box<dyn Error> = Box::new(RowError::ValueTooLarge {
            value: u32::MAX,
            max: u32::MAX - 3,
        });
        assert!(e.to_string().contains("exceeds maximum"));
    }
}
