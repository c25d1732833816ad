//! Test utilities for ragged development.
//!
//! Provides [`NestedOracle`], a plain `Vec<Option<Vec<Slot>>>` model with
//! the same observable semantics as the flat-buffer store, and
//! [`OpGenerator`], a seeded stream of random [`Op`]s for differential
//! testing against it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod ops;
pub mod oracle;

pub use ops::{Op, OpGenerator};
pub use oracle::NestedOracle;

use ragged_core::Slot;

/// Wrap plain values as slots.
pub fn slots(values: &[u32]) -> Vec<Slot> {
    values.iter().map(|&v| Slot::Value(v)).collect()
}
