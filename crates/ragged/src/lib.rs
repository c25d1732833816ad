//! Ragged: sparse, growable collections of variable-length integer rows.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the ragged sub-crates. For most users, adding `ragged` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ragged::prelude::*;
//!
//! // Postings lists keyed by term id; most ids have no postings yet.
//! let mut postings = SparseRowArray::new();
//! postings.set_row(3, Some(&[10u32, 42])).unwrap();
//! postings.add_to_set(3, 17u32).unwrap();
//! postings.insert_row::<u32>(0, Some(&[])).unwrap();
//!
//! assert_eq!(postings.len(), 5);
//! assert_eq!(postings.row_state(4).unwrap(), RowState::Filled(3));
//! assert_eq!(postings.get_slot(4, 2).unwrap(), Slot::Value(17));
//! assert_eq!(
//!     postings.to_string(),
//!     "[[], absent, absent, absent, [10, 42, 17]]"
//! );
//!
//! // Drop slack left behind by structural edits.
//! postings.remove_row(1);
//! postings.purge();
//! assert_eq!(postings.len(), 4);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ragged-core` | `Slot`, `Row`, `RowState`, `RowError` |
//! | [`store`] | `ragged-store` | `SparseRowArray`, allocator, buffers, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Slot, row, and error types (`ragged-core`).
pub use ragged_core as types;

/// Flat-buffer storage engine (`ragged-store`).
///
/// [`store::SparseRowArray`] is the main entry point; the allocator and
/// buffer types are exposed for inspection and tuning.
pub use ragged_store as store;

/// Common imports for typical ragged usage.
///
/// ```rust
/// use ragged::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use ragged_core::{Row, RowError, RowState, Slot};

    // Store
    pub use ragged_store::{ConfigError, SparseRowArray, StoreConfig, StoreStats};
}
