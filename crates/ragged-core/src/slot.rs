//! The [`Slot`] tagged variant and materialized [`Row`] type.

use smallvec::SmallVec;
use std::fmt;

/// One element of a row.
///
/// A slot is either a non-negative integer, an explicit `Null`, or
/// `Unset` (a position that exists but was never given a value).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// A position with no value.
    #[default]
    Unset,
    /// An explicit null marker.
    Null,
    /// A non-negative integer, at most [`Slot::MAX_VALUE`].
    Value(u32),
}

impl Slot {
    /// Largest integer a [`Slot::Value`] may hold.
    ///
    /// Storage reserves the three lowest 32-bit codes for slack, `Unset`
    /// and `Null`, so values are limited to `u32::MAX - 3`.
    pub const MAX_VALUE: u32 = u32::MAX - 3;

    /// The integer payload, or `None` for `Unset` and `Null`.
    pub fn value(self) -> Option<u32> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Null => None,
        }
    }

    /// Whether this slot carries an integer.
    pub fn is_value(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<u32> for Slot {
    fn from(v: u32) -> Self {
        Self::Value(v)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Null => write!(f, "null"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// A materialized row: the ordered slots of one present row.
///
/// Rows up to eight slots long stay inline, so reading short rows out of
/// the store does not touch the heap.
pub type Row = SmallVec<[Slot; 8]>;

/// The lifecycle state of a single row.
///
/// Rows move `Absent -> Empty -> Filled(n)` as content is written and
/// back to `Absent` when deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowState {
    /// The row is a hole.
    Absent,
    /// The row exists but holds no slots.
    Empty,
    /// The row holds this many slots (always at least one).
    Filled(usize),
}

impl RowState {
    /// Logical length of the row; zero for absent and empty rows.
    pub fn len(self) -> usize {
        match self {
            Self::Absent | Self::Empty => 0,
            Self::Filled(n) => n,
        }
    }

    /// Whether the row holds no slots (absent or empty).
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether the row exists (is not a hole).
    pub fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slot_is_unset() {
        assert_eq!(Slot::default(), Slot::Unset);
    }

    #[test]
    fn value_accessor() {
        assert_eq!(Slot::Value(7).value(), Some(7));
        assert_eq!(Slot::Null.value(), None);
        assert_eq!(Slot::Unset.value(), None);
        assert!(Slot::from(0).is_value());
        assert!(!Slot::Null.is_value());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Slot::Value(42).to_string(), "42");
        assert_eq!(Slot::Null.to_string(), "null");
        assert_eq!(Slot::Unset.to_string(), "unset");
    }

    #[test]
    fn row_state_lengths() {
        assert_eq!(RowState::Absent.len(), 0);
        assert_eq!(RowState::Empty.len(), 0);
        assert_eq!(RowState::Filled(3).len(), 3);
        assert!(!RowState::Absent.is_present());
        assert!(RowState::Empty.is_present());
        assert!(RowState::Empty.is_empty());
        assert!(!RowState::Filled(1).is_empty());
    }
}
