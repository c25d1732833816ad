//! Reference model for the sparse row store.
//!
//! Every operation is written in the most obvious way on nested vectors,
//! so that a disagreement with the store points at the store.

use ragged_core::{RowError, Slot};

/// Nested-vector model of a sparse row array.
///
/// Values passed in must be storable (at most [`Slot::MAX_VALUE`]); the
/// oracle does not model encoding failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NestedOracle {
    rows: Vec<Option<Vec<Slot>>>,
}

impl NestedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The modelled nested form.
    pub fn rows(&self) -> &[Option<Vec<Slot>>] {
        &self.rows
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn set_row(&mut self, row: usize, content: Option<&[Slot]>) {
        if row >= self.rows.len() {
            self.rows.resize(row + 1, None);
        }
        self.rows[row] = content.map(<[Slot]>::to_vec);
    }

    pub fn get_row(&self, row: usize) -> Result<Option<Vec<Slot>>, RowError> {
        self.check_row(row)?;
        Ok(self.rows[row].clone())
    }

    pub fn insert_row(&mut self, row: usize, content: Option<&[Slot]>) {
        if row > self.rows.len() {
            self.set_row(row, content);
        } else {
            self.rows.insert(row, content.map(<[Slot]>::to_vec));
        }
    }

    pub fn push_row(&mut self, content: Option<&[Slot]>) -> usize {
        self.rows.push(content.map(<[Slot]>::to_vec));
        self.rows.len()
    }

    pub fn delete_row(&mut self, row: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            *r = None;
        }
    }

    pub fn remove_row(&mut self, row: usize) -> Option<Vec<Slot>> {
        if row >= self.rows.len() {
            return None;
        }
        self.rows.remove(row)
    }

    pub fn pop_row(&mut self) -> Option<Vec<Slot>> {
        self.rows.pop().flatten()
    }

    pub fn row_length(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .and_then(Option::as_ref)
            .map_or(0, Vec::len)
    }

    pub fn get_slot(&self, row: usize, slot: usize) -> Result<Slot, RowError> {
        self.check_slot(row, slot)?;
        Ok(self.present(row)[slot])
    }

    pub fn set_slot(&mut self, row: usize, slot: usize, value: Slot) -> Result<(), RowError> {
        self.check_slot(row, slot)?;
        self.present_mut(row)[slot] = value;
        Ok(())
    }

    pub fn push_slot(&mut self, row: usize, value: Slot) -> Result<usize, RowError> {
        self.check_row(row)?;
        let slots = self.present_mut(row);
        slots.push(value);
        Ok(slots.len())
    }

    pub fn pop_slot(&mut self, row: usize) -> Result<Slot, RowError> {
        self.check_row(row)?;
        Ok(self.rows[row]
            .as_mut()
            .and_then(Vec::pop)
            .unwrap_or(Slot::Unset))
    }

    pub fn insert_slot(&mut self, row: usize, slot: usize, value: Slot) -> Result<usize, RowError> {
        self.check_row(row)?;
        let len = self.row_length(row);
        if slot > len {
            return Err(RowError::SlotOutOfRange { row, slot, len });
        }
        let slots = self.present_mut(row);
        slots.insert(slot, value);
        Ok(slots.len())
    }

    pub fn remove_slot(&mut self, row: usize, slot: usize) -> Result<Slot, RowError> {
        self.check_slot(row, slot)?;
        Ok(self.present_mut(row).remove(slot))
    }

    pub fn index_of_slot(&self, row: usize, value: Slot) -> Result<Option<usize>, RowError> {
        self.check_row(row)?;
        Ok(self.rows[row]
            .as_ref()
            .and_then(|slots| slots.iter().position(|&s| s == value)))
    }

    pub fn add_to_set(&mut self, row: usize, value: Slot) -> Result<bool, RowError> {
        if self.index_of_slot(row, value)?.is_some() {
            return Ok(false);
        }
        self.push_slot(row, value)?;
        Ok(true)
    }

    pub fn remove_from_set(&mut self, row: usize, value: Slot) -> Result<bool, RowError> {
        match self.index_of_slot(row, value)? {
            Some(slot) => {
                self.remove_slot(row, slot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn check_row(&self, row: usize) -> Result<(), RowError> {
        if row >= self.rows.len() {
            return Err(RowError::RowOutOfRange {
                row,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    fn check_slot(&self, row: usize, slot: usize) -> Result<(), RowError> {
        self.check_row(row)?;
        let len = self.row_length(row);
        if slot >= len {
            return Err(RowError::SlotOutOfRange { row, slot, len });
        }
        Ok(())
    }

    fn present(&self, row: usize) -> &[Slot] {
        self.rows[row].as_deref().unwrap_or(&[])
    }

    /// Row `row`, made present if it was absent.
    fn present_mut(&mut self, row: usize) -> &mut Vec<Slot> {
        self.rows[row].get_or_insert_with(Vec::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots;

    #[test]
    fn set_row_past_end_pads_with_absent() {
        let mut o = NestedOracle::new();
        o.set_row(2, Some(slots(&[1, 2]).as_slice()));
        assert_eq!(o.rows(), &[None, None, Some(slots(&[1, 2]))]);
    }

    #[test]
    fn pop_slot_on_absent_row_stays_absent() {
        let mut o = NestedOracle::new();
        o.push_row(None);
        assert_eq!(o.pop_slot(0), Ok(Slot::Unset));
        assert_eq!(o.get_row(0), Ok(None));
    }

    #[test]
    fn push_slot_on_absent_row_makes_it_present() {
        let mut o = NestedOracle::new();
        o.push_row(None);
        assert_eq!(o.push_slot(0, Slot::Value(5)), Ok(1));
        assert_eq!(o.get_row(0), Ok(Some(slots(&[5]))));
    }

    #[test]
    fn insert_slot_bounds() {
        let mut o = NestedOracle::new();
        o.push_row(Some(slots(&[1]).as_slice()));
        assert_eq!(
            o.insert_slot(0, 2, Slot::Null),
            Err(RowError::SlotOutOfRange {
                row: 0,
                slot: 2,
                len: 1
            })
        );
        assert_eq!(o.insert_slot(0, 0, Slot::Null), Ok(2));
    }
}
