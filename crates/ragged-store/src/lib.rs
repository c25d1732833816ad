//! Padded flat-buffer storage for sparse collections of jagged rows.
//!
//! Every row of a [`SparseRowArray`] lives in one shared data buffer,
//! addressed through a start-offset table and described by a length-code
//! table. Rows are padded so that appends rarely move anything; deletes
//! and removes leave slack behind that [`SparseRowArray::purge`] reclaims.
//!
//! # Architecture
//!
//! ```text
//! SparseRowArray (bounds checks, slot encoding, public API)
//! └── RowAllocator (row placement, stretch, gaps, purge)
//!     ├── DataBuffer  → FlatBuffer (sentinel-coded slots + slack)
//!     ├── IndexTable  → FlatBuffer (row start offsets + end sentinel)
//!     └── LengthTable → FlatBuffer (absent / empty / length codes)
//! ```
//!
//! All three flat buffers grow by fixed blocks configured through
//! [`StoreConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod array;
pub mod config;
pub mod data;
mod display;
pub mod flat;
pub mod iter;
pub mod stats;
pub mod table;

pub use allocator::{AllocatorCounters, RowAllocator};
pub use array::SparseRowArray;
pub use config::{ConfigError, StoreConfig};
pub use iter::{Rows, SlotIter};
pub use stats::StoreStats;
