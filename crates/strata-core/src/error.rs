//! Error types for the strata containers.
//!
//! Split by container family: [`SeqError`] for growable sequences and
//! [`MapError`] for associative maps. Every error is returned to the
//! immediate caller; none of them is fatal to the process.

use std::error::Error;
use std::fmt;

/// Errors from sequence construction, indexing, and slicing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeqError {
    /// A construction argument is out of its valid domain
    /// (e.g. a visible length larger than the requested capacity).
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// An element index is not below the view's length.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Length of the view at the time of the call.
        len: usize,
    },
    /// Slice bounds violate `start <= end <= len`.
    SliceOutOfRange {
        /// Requested start of the window.
        start: usize,
        /// Requested end of the window (exclusive).
        end: usize,
        /// Length of the view at the time of the call.
        len: usize,
    },
}

impl SeqError {
    /// Whether this error reports violated index or slice bounds.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::SliceOutOfRange { .. }
        )
    }
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index out of range [{index}] with length {len}")
            }
            Self::SliceOutOfRange { start, end, len } => {
                write!(f, "slice bounds out of range [{start}:{end}] with length {len}")
            }
        }
    }
}

impl Error for SeqError {}

/// Errors from associative map mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// A write was attempted on a map that was never initialized.
    UninitializedWrite,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedWrite => write!(f, "write to uninitialized map"),
        }
    }
}

impl Error for MapError {}
