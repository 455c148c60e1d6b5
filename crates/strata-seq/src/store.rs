//! Fixed-size backing stores shared between views.
//!
//! A [`BackingStore`] is a contiguous block of `T` allocated once at its
//! final size. Stores never grow or shrink in place: a sequence that runs
//! out of room allocates a fresh store and copies its live elements over.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;

use smallvec::SmallVec;
use strata_core::StoreId;

/// Inline capacity of the staging buffer used by appends.
pub(crate) const STAGING_INLINE: usize = 16;

/// Staging buffer for values that must be read in full before any write.
pub(crate) type Staging<T> = SmallVec<[T; STAGING_INLINE]>;

/// A single contiguous memory region holding sequence elements.
///
/// Every slot is initialised at allocation (with `T::default()` unless the
/// caller supplies the contents), so any position inside the store can be
/// read or written. Views refer to a store through `Rc`, and the store
/// lives as long as its last view.
pub struct BackingStore<T> {
    id: StoreId,
    /// Element storage. Allocated to full size at creation.
    cells: RefCell<Box<[T]>>,
}

impl<T: Clone + Default> BackingStore<T> {
    /// Allocate a store of `size` zero-valued elements.
    pub fn new(size: usize) -> Self {
        Self::from_vec(vec![T::default(); size])
    }
}

impl<T: Clone> BackingStore<T> {
    /// Clone the element at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the store.
    pub fn read(&self, pos: usize) -> T {
        self.cells.borrow()[pos].clone()
    }

    /// Clone a range of elements into a new `Vec`.
    pub fn read_range(&self, range: Range<usize>) -> Vec<T> {
        self.cells.borrow()[range].to_vec()
    }

    /// Clone a range of elements into a staging buffer.
    pub(crate) fn stage(&self, range: Range<usize>) -> Staging<T> {
        self.cells.borrow()[range].iter().cloned().collect()
    }

    /// Copy `count` elements from `src` to `dst` inside this store.
    ///
    /// The ranges may overlap; the result is as if the source had been
    /// read completely before the first write.
    pub fn copy_within(&self, src: usize, dst: usize, count: usize) {
        if count == 0 || src == dst {
            return;
        }
        let mut cells = self.cells.borrow_mut();
        if dst < src {
            // Moving left: a forward walk reads each slot before it is written.
            for i in 0..count {
                let value = cells[src + i].clone();
                cells[dst + i] = value;
            }
        } else {
            for i in (0..count).rev() {
                let value = cells[src + i].clone();
                cells[dst + i] = value;
            }
        }
    }
}

impl<T> BackingStore<T> {
    /// Allocate a store holding exactly `cells`.
    pub fn from_vec(cells: Vec<T>) -> Self {
        Self {
            id: StoreId::next(),
            cells: RefCell::new(cells.into_boxed_slice()),
        }
    }

    /// Process-unique identifier of this allocation.
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Number of element slots in the store.
    pub fn size(&self) -> usize {
        self.cells.borrow().len()
    }

    /// Memory usage of the element storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.size() * std::mem::size_of::<T>()
    }

    /// Overwrite the element at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the store.
    pub fn write(&self, pos: usize, value: T) {
        self.cells.borrow_mut()[pos] = value;
    }

    /// Write `values` consecutively starting at `start`.
    ///
    /// Values past the end of the store are not consumed.
    pub fn write_from<I>(&self, start: usize, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut cells = self.cells.borrow_mut();
        for (slot, value) in cells[start..].iter_mut().zip(values) {
            *slot = value;
        }
    }

    /// Call `f` with a shared view of a range of elements.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this store, or if `range` is outside it.
    pub fn with_range<R>(&self, range: Range<usize>, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.cells.borrow()[range])
    }
}

impl<T> fmt::Debug for BackingStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackingStore")
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}
