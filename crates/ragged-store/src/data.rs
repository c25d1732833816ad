//! The data buffer: every row's encoded slots, stored back to back.
//!
//! Slots are stored as 32-bit sentinel codes. This module is the only
//! place that knows the encoding:
//!
//! | Code     | Meaning                              |
//! |----------|--------------------------------------|
//! | `0`      | unused slack (reads back as `Unset`) |
//! | `1`      | [`Slot::Unset`]                      |
//! | `2`      | [`Slot::Null`]                       |
//! | `v + 3`  | [`Slot::Value(v)`](Slot::Value)      |

use ragged_core::{RowError, Slot};

use crate::flat::FlatBuffer;

/// Code reserved for slack positions.
pub const SLACK_CODE: u32 = 0;
const UNSET_CODE: u32 = 1;
const NULL_CODE: u32 = 2;
const VALUE_BIAS: u32 = 3;

/// Encode a slot as its sentinel code.
///
/// Fails with [`RowError::ValueTooLarge`] if the value is above
/// [`Slot::MAX_VALUE`].
pub fn encode(slot: Slot) -> Result<u32, RowError> {
    match slot {
        Slot::Unset => Ok(UNSET_CODE),
        Slot::Null => Ok(NULL_CODE),
        Slot::Value(v) => v.checked_add(VALUE_BIAS).ok_or(RowError::ValueTooLarge {
            value: v,
            max: Slot::MAX_VALUE,
        }),
    }
}

/// Decode a sentinel code back into a slot.
///
/// The slack code decodes to `Unset`; it never appears inside a row's
/// logical range unless the store is corrupt.
#[inline]
pub fn decode(code: u32) -> Slot {
    match code {
        SLACK_CODE | UNSET_CODE => Slot::Unset,
        NULL_CODE => Slot::Null,
        c => Slot::Value(c - VALUE_BIAS),
    }
}

/// Growable flat buffer of encoded slots, including every row's slack.
#[derive(Clone, Debug)]
pub struct DataBuffer {
    codes: FlatBuffer,
}

impl DataBuffer {
    /// Create an empty data buffer.
    pub fn new(capacity: usize, growth_step: usize) -> Self {
        Self {
            codes: FlatBuffer::new("data", capacity, growth_step),
        }
    }

    /// Ensure at least `min_free` slots of capacity past the occupied end.
    pub fn grow(&mut self, min_free: usize) -> bool {
        self.codes.grow(min_free)
    }

    /// Set the occupied length. New positions are filled with slack.
    pub fn set_len(&mut self, len: usize) {
        self.codes.set_len(len);
    }

    /// Occupied length in slots (live content plus slack).
    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }

    /// Allocated capacity in slots.
    pub fn capacity(&self) -> usize {
        self.codes.capacity()
    }

    /// Move `count` slots from `from` to `to`; the ranges may overlap.
    pub fn shift_range(&mut self, from: usize, to: usize, count: usize) {
        self.codes.copy_within(from, to, count);
    }

    /// Reset `count` positions starting at `start` to slack.
    pub fn clear(&mut self, start: usize, count: usize) {
        self.codes.fill(start, count, SLACK_CODE);
    }

    /// Decode the slot at `pos`.
    #[inline]
    pub fn read(&self, pos: usize) -> Slot {
        decode(self.codes.get(pos))
    }

    /// Store an already-encoded slot at `pos`.
    #[inline]
    pub fn write_code(&mut self, pos: usize, code: u32) {
        self.codes.set(pos, code);
    }

    /// Store a run of already-encoded slots starting at `start`.
    pub fn write_codes(&mut self, start: usize, codes: &[u32]) {
        self.codes.as_mut_slice()[start..start + codes.len()].copy_from_slice(codes);
    }

    /// The raw codes of `len` slots starting at `start`.
    pub fn codes(&self, start: usize, len: usize) -> &[u32] {
        &self.codes.as_slice()[start..start + len]
    }

    /// Position of the first occurrence of `code` in `start..start + len`,
    /// relative to `start`.
    pub fn position(&self, start: usize, len: usize, code: u32) -> Option<usize> {
        self.codes(start, len).iter().position(|&c| c == code)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_codes() {
        assert_eq!(encode(Slot::Unset), Ok(1));
        assert_eq!(encode(Slot::Null), Ok(2));
        assert_eq!(encode(Slot::Value(0)), Ok(3));
        assert_eq!(encode(Slot::Value(Slot::MAX_VALUE)), Ok(u32::MAX));
    }

    #[test]
    fn oversized_value_rejected() {
        assert_eq!(
            encode(Slot::Value(Slot::MAX_VALUE + 1)),
            Err(RowError::ValueTooLarge {
                value: Slot::MAX_VALUE + 1,
                max: Slot::MAX_VALUE,
            })
        );
    }

    #[test]
    fn slack_decodes_as_unset() {
        assert_eq!(decode(SLACK_CODE), Slot::Unset);
    }

    #[test]
    fn write_then_read() {
        let mut data = DataBuffer::new(16, 16);
        data.set_len(4);
        let codes = [encode(Slot::Value(9)).unwrap(), encode(Slot::Null).unwrap()];
        data.write_codes(1, &codes);
        assert_eq!(data.read(0), Slot::Unset);
        assert_eq!(data.read(1), Slot::Value(9));
        assert_eq!(data.read(2), Slot::Null);
        assert_eq!(data.position(0, 4, codes[1]), Some(2));
        assert_eq!(data.position(0, 2, codes[1]), None);
    }

    #[test]
    fn clear_resets_to_slack() {
        let mut data = DataBuffer::new(8, 8);
        data.set_len(3);
        data.write_codes(0, &[5, 6, 7]);
        data.clear(1, 2);
        assert_eq!(data.codes(0, 3), &[5, 0, 0]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_slot() -> impl Strategy<Value = Slot> {
            prop_oneof![
                Just(Slot::Unset),
                Just(Slot::Null),
                (0u32..=Slot::MAX_VALUE).prop_map(Slot::Value),
            ]
        }

        proptest! {
            #[test]
            fn decode_inverts_encode(slot in any_slot()) {
                let code = encode(slot).unwrap();
                prop_assert_ne!(code, SLACK_CODE);
                prop_assert_eq!(decode(code), slot);
            }
        }
    }
}
