//! Associative maps for the strata workspace.
//!
//! - [`AssocMap`]: single-threaded, with an explicit nil state. Reads on a
//!   nil map find nothing; writes fail with
//!   [`MapError::UninitializedWrite`]. Handles share their entries.
//! - [`ConcurrentMap`]: lock-striped and `Send + Sync`, always
//!   initialized, with early-exit [`range`](ConcurrentMap::range)
//!   iteration.
//!
//! Neither map specifies an iteration order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assoc;
pub mod concurrent;

pub use assoc::AssocMap;
pub use concurrent::ConcurrentMap;
pub use strata_core::MapError;
