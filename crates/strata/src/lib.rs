//! Strata: aliasing-aware growable sequences and associative maps.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Views share a backing store until growth forces a reallocation.
//! let seq: Seq<i32> = Seq::with_capacity(3);
//! let filled = seq.append([4, 5, 6]);
//! assert!(filled.shares_store(&seq));
//!
//! let grown = filled.append([7]);
//! assert_eq!(grown.to_vec(), vec![4, 5, 6, 7]);
//! assert_eq!(grown.cap(), 6);
//! assert!(!grown.shares_store(&filled));
//!
//! // A nil map reads as empty and refuses writes.
//! let nil: AssocMap<&str, i32> = AssocMap::nil();
//! assert_eq!(nil.get("a"), None);
//! assert_eq!(nil.set("a", 1), Err(MapError::UninitializedWrite));
//!
//! let map = AssocMap::make();
//! map.set("a", 1).unwrap();
//! assert_eq!(map.get("a"), Some(1));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Errors, store IDs, growth policy |
//! | [`seq`] | `strata-seq` | `Seq` views and backing stores |
//! | [`map`] | `strata-map` | `AssocMap` and `ConcurrentMap` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`strata-core`).
///
/// Error enums, [`types::StoreId`], and [`types::GrowthPolicy`].
pub use strata_core as types;

/// Growable sequences (`strata-seq`).
///
/// [`seq::Seq`] views over shared [`seq::BackingStore`]s, plus the
/// overlap-safe [`seq::copy`].
pub use strata_seq as seq;

/// Associative maps (`strata-map`).
///
/// [`map::AssocMap`] with an explicit nil state and the thread-safe
/// [`map::ConcurrentMap`].
pub use strata_map as map;

/// Common imports for typical strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Sequences
    pub use strata_seq::{copy, Seq};

    // Maps
    pub use strata_map::{AssocMap, ConcurrentMap};

    // Core types and errors
    pub use strata_core::{GrowthPolicy, MapError, SeqError, StoreId};
}
