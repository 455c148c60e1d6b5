//! Growable sequences with explicit shared-backing-store aliasing.
//!
//! # Architecture
//!
//! ```text
//! Seq<T> (view: offset, len, cap, growth policy)
//! └── Rc<BackingStore<T>> (fixed-size Box<[T]>, shared by every view
//!                          sliced or appended in place from it)
//! ```
//!
//! Slicing, cloning, and in-place appends produce views over the *same*
//! store, so writes through one are visible through all of them. Appends
//! that exceed the capacity, [`Seq::deep_copy`], and [`Seq::copy_range`]
//! allocate a new store; from then on the old and new views diverge.
//!
//! # Example
//!
//! ```rust
//! use strata_seq::Seq;
//!
//! let base = Seq::from_values(1..=9);
//! let window = base.slice(1, 6).unwrap();
//! base.set(2, 666).unwrap();
//! assert_eq!(window.get(1), Ok(666));
//!
//! let grown = window.deep_copy().append([10]);
//! assert!(!grown.shares_store(&base));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod seq;
pub mod store;

pub use seq::{copy, Seq};
pub use store::BackingStore;
pub use strata_core::{GrowthPolicy, SeqError, StoreId};
