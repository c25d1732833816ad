//! Core types for ragged sparse row storage.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the storage engine and its test utilities:
//! the [`Slot`] tagged variant, the materialized [`Row`] type, and the
//! [`RowError`] error enum.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod slot;

pub use error::RowError;
pub use slot::{Row, RowState, Slot};
