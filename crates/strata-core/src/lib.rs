//! Core types for the strata sequence and map containers.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the shared vocabulary used throughout the strata workspace: error
//! types, backing-store identifiers, and the growth policy that decides
//! how a sequence reallocates once its capacity is exhausted.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod policy;

pub use error::{MapError, SeqError};
pub use id::StoreId;
pub use policy::GrowthPolicy;
