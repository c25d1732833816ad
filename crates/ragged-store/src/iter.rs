//! Borrowed, lazily decoding views over stored rows.
//!
//! Views borrow the array immutably, so the borrow checker revokes them
//! before any mutating call can relocate the underlying buffers.

use std::iter::FusedIterator;
use std::slice;

use ragged_core::Slot;

use crate::array::SparseRowArray;
use crate::data::decode;

/// Iterator over the slots of one present row.
#[derive(Clone, Debug)]
pub struct SlotIter<'a> {
    codes: slice::Iter<'a, u32>,
}

impl<'a> SlotIter<'a> {
    pub(crate) fn new(codes: &'a [u32]) -> Self {
        Self {
            codes: codes.iter(),
        }
    }
}

impl Iterator for SlotIter<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        self.codes.next().map(|&c| decode(c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.codes.size_hint()
    }
}

impl DoubleEndedIterator for SlotIter<'_> {
    fn next_back(&mut self) -> Option<Slot> {
        self.codes.next_back().map(|&c| decode(c))
    }
}

impl ExactSizeIterator for SlotIter<'_> {}

impl FusedIterator for SlotIter<'_> {}

/// Iterator over every row of an array, yielding `None` for absent rows.
#[derive(Clone, Debug)]
pub struct Rows<'a> {
    array: &'a SparseRowArray,
    next: usize,
    end: usize,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(array: &'a SparseRowArray) -> Self {
        Self {
            array,
            next: 0,
            end: array.len(),
        }
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Option<SlotIter<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let row = self.array.row_view(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Rows<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.array.row_view(self.end))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}
