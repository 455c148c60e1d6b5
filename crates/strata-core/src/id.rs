//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`StoreId`] allocation.
static STORE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-allocation identifier for a backing store.
///
/// Allocated from a monotonic atomic counter via [`StoreId::next`]. Two
/// distinct stores always have different IDs, even if one was dropped and
/// the other happens to reuse its memory. Two views report the same
/// `StoreId` exactly when they share storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    /// Allocate a fresh, unique store ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(STORE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}
