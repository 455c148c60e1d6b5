//! Capacity growth policy for sequences.

/// Decides the capacity of a freshly grown backing store.
///
/// Small stores double; once the current capacity exceeds
/// [`threshold`](GrowthPolicy::threshold) they grow by a quarter instead.
/// The result is never smaller than the length the caller needs.
/// All values are immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Largest capacity that still grows by doubling.
    ///
    /// Default: 1024 elements. Above it each reallocation grows the
    /// capacity by `ceil(capacity * 1.25)`.
    pub threshold: usize,
}

impl GrowthPolicy {
    /// Default doubling threshold in elements.
    pub const DEFAULT_THRESHOLD: usize = 1024;

    /// Create a policy with the given doubling threshold.
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Capacity to allocate when `current` cannot hold `required` elements.
    ///
    /// `max(2 * current, required)` while `current <= threshold`, and
    /// `max(ceil(1.25 * current), required)` beyond it.
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        let grown = if current <= self.threshold {
            current.saturating_mul(2)
        } else {
            current.saturating_add(current.div_ceil(4))
        };
        grown.max(required)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
