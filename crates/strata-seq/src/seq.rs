//! Views over shared backing stores.
//!
//! A [`Seq`] is a `(store, offset, len, cap)` window. Cloning or slicing a
//! view never copies elements: the result points at the same
//! [`BackingStore`], so a write through one view is visible through every
//! other view whose window covers the same slot. Only growth past the
//! capacity, [`Seq::deep_copy`], and [`Seq::copy_range`] allocate.

use std::fmt;
use std::rc::Rc;

use strata_core::{GrowthPolicy, SeqError, StoreId};

use crate::store::{BackingStore, Staging};

/// A growable sequence handle: a window into a shared backing store.
///
/// Invariant: `len <= cap <= store.size() - offset`. A view with no store
/// is *nil*; it has length and capacity zero and is distinct from an empty
/// view over a zero-sized store (see [`Seq::is_nil`]).
///
/// `Seq` is deliberately `!Send` and `!Sync`: callers that share stores
/// across threads must serialise access themselves, and the type system
/// makes them do so.
pub struct Seq<T> {
    store: Option<Rc<BackingStore<T>>>,
    offset: usize,
    len: usize,
    cap: usize,
    policy: GrowthPolicy,
}

impl<T> Seq<T> {
    /// A nil view: never backed by any store.
    pub fn nil() -> Self {
        Self {
            store: None,
            offset: 0,
            len: 0,
            cap: 0,
            policy: GrowthPolicy::default(),
        }
    }

    /// Replace the growth policy used when this view (and views derived
    /// from it) reallocate. The store is not touched.
    pub fn with_policy(mut self, policy: GrowthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Growth policy carried by this view.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Build a view over a store that holds exactly `cells`, all visible.
    fn over_vec(cells: Vec<T>, policy: GrowthPolicy) -> Self {
        let len = cells.len();
        Self {
            store: Some(Rc::new(BackingStore::from_vec(cells))),
            offset: 0,
            len,
            cap: len,
            policy,
        }
    }

    /// Whether this view has never been backed by a store.
    ///
    /// `Seq::nil()` is nil; `Seq::with_capacity(0)` and an empty literal are
    /// not, even though all three have length zero.
    pub fn is_nil(&self) -> bool {
        self.store.is_none()
    }

    /// Number of visible elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view has no visible elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the view can hold before the next append
    /// reallocates.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Position of the window's first element inside its store.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Identifier of the backing store, or `None` for a nil view.
    pub fn store_id(&self) -> Option<StoreId> {
        self.store.as_ref().map(|s| s.id())
    }

    /// Whether both views are backed by the same store.
    pub fn shares_store(&self, other: &Seq<T>) -> bool {
        match (&self.store, &other.store) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether a write through one view can become visible through the
    /// other: same store and overlapping `[offset, offset + cap)` windows.
    pub fn aliases(&self, other: &Seq<T>) -> bool {
        self.shares_store(other)
            && self.offset < other.offset + other.cap
            && other.offset < self.offset + self.cap
    }

    /// Memory held by the backing store in bytes (zero for a nil view).
    pub fn store_bytes(&self) -> usize {
        self.store.as_ref().map_or(0, |s| s.memory_bytes())
    }

    /// Number of views currently holding this view's store.
    pub fn store_refs(&self) -> usize {
        self.store.as_ref().map_or(0, Rc::strong_count)
    }

    /// Call `f` with the visible elements as a borrowed slice.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes through any view of the same store.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        match &self.store {
            Some(store) => store.with_range(self.window(), f),
            None => f(&[]),
        }
    }

    /// Overwrite the element at `index`, visible to every aliasing view.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] unless `index < len`.
    pub fn set(&self, index: usize, value: T) -> Result<(), SeqError> {
        let store = self.store_for(index)?;
        store.write(self.offset + index, value);
        Ok(())
    }

    /// A view of elements `start..end` over the same store. No copy.
    ///
    /// The result keeps the capacity from `start` to the end of this
    /// view's capacity, so appending to it may overwrite elements this
    /// view (or others) can still see.
    ///
    /// # Errors
    ///
    /// [`SeqError::SliceOutOfRange`] unless `start <= end <= len`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Seq<T>, SeqError> {
        if start > end || end > self.len {
            return Err(SeqError::SliceOutOfRange {
                start,
                end,
                len: self.len,
            });
        }
        if self.store.is_none() {
            return Ok(self.clone());
        }
        Ok(Self {
            store: self.store.clone(),
            offset: self.offset + start,
            len: end - start,
            cap: self.cap - start,
            policy: self.policy,
        })
    }

    /// `slice(start, len)`: drop elements from the head.
    pub fn slice_from(&self, start: usize) -> Result<Seq<T>, SeqError> {
        self.slice(start, self.len)
    }

    /// `slice(0, end)`: drop elements from the tail.
    pub fn slice_to(&self, end: usize) -> Result<Seq<T>, SeqError> {
        self.slice(0, end)
    }

    fn window(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }

    fn store_for(&self, index: usize) -> Result<&Rc<BackingStore<T>>, SeqError> {
        let out_of_range = SeqError::IndexOutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }
        self.store.as_ref().ok_or(out_of_range)
    }
}

impl<T: Clone + Default> Seq<T> {
    /// An empty view over a fresh store of `n` zero-valued slots.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            store: Some(Rc::new(BackingStore::new(n))),
            offset: 0,
            len: 0,
            cap: n,
            policy: GrowthPolicy::default(),
        }
    }

    /// A view of `len` zero values over a fresh store of `cap` slots.
    ///
    /// # Errors
    ///
    /// [`SeqError::InvalidArgument`] if `len > cap`.
    pub fn make(len: usize, cap: usize) -> Result<Self, SeqError> {
        if len > cap {
            return Err(SeqError::InvalidArgument {
                reason: format!("len {len} larger than cap {cap}"),
            });
        }
        let mut seq = Self::with_capacity(cap);
        seq.len = len;
        Ok(seq)
    }

    /// A view over a store sized exactly to `values`.
    ///
    /// An empty input still allocates, so the result is empty but not nil.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::over_vec(values.into_iter().collect(), GrowthPolicy::default())
    }

    /// Clone the element at `index`.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] unless `index < len`.
    pub fn get(&self, index: usize) -> Result<T, SeqError> {
        let store = self.store_for(index)?;
        Ok(store.read(self.offset + index))
    }

    /// Clone the visible elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        match &self.store {
            Some(store) => store.read_range(self.window()),
            None => Vec::new(),
        }
    }

    /// Append `values`, returning the resulting view.
    ///
    /// With room left (`len + n <= cap`) the values are written in place
    /// right after the visible elements and the result shares this view's
    /// store. The slots written are not checked for other owners: a view
    /// that can see them will observe the new values.
    ///
    /// Otherwise a new store is allocated with the capacity chosen by the
    /// view's [`GrowthPolicy`], the `len` visible elements are copied over,
    /// and the result no longer aliases this view.
    ///
    /// Appending nothing returns this view unchanged (a nil view stays nil).
    #[must_use]
    pub fn append<I>(&self, values: I) -> Seq<T>
    where
        I: IntoIterator<Item = T>,
    {
        self.append_staged(values.into_iter().collect())
    }

    /// Append every visible element of `other`.
    ///
    /// `other` is read in full before anything is written, so appending a
    /// view to itself, or a view that overlaps the write position, is well
    /// defined.
    #[must_use]
    pub fn append_seq(&self, other: &Seq<T>) -> Seq<T> {
        let staged = match &other.store {
            Some(store) => store.stage(other.window()),
            None => Staging::new(),
        };
        self.append_staged(staged)
    }

    fn append_staged(&self, values: Staging<T>) -> Seq<T> {
        if values.is_empty() {
            return self.clone();
        }
        let required = self.len + values.len();
        match &self.store {
            Some(store) if required <= self.cap => {
                store.write_from(self.offset + self.len, values);
                Self {
                    store: Some(Rc::clone(store)),
                    offset: self.offset,
                    len: required,
                    cap: self.cap,
                    policy: self.policy,
                }
            }
            _ => self.grow_with(required, values),
        }
    }

    /// Reallocate into a store large enough for `required` elements and
    /// write `values` after the copied live elements.
    fn grow_with(&self, required: usize, values: Staging<T>) -> Seq<T> {
        let new_cap = self.policy.next_capacity(self.cap, required);
        let mut cells = Vec::with_capacity(new_cap);
        if let Some(store) = &self.store {
            store.with_range(self.window(), |live| cells.extend_from_slice(live));
        }
        cells.extend(values);
        cells.resize(new_cap, T::default());

        let grown = Self {
            store: Some(Rc::new(BackingStore::from_vec(cells))),
            offset: 0,
            len: required,
            cap: new_cap,
            policy: self.policy,
        };
        tracing::trace!(
            from = ?self.store_id(),
            to = ?grown.store_id(),
            old_cap = self.cap,
            new_cap,
            len = required,
            bytes = grown.store_bytes(),
            "sequence store reallocated"
        );
        grown
    }

    /// Copy elements from `src` into this view; see [`copy`].
    pub fn copy_from(&self, src: &Seq<T>) -> usize {
        copy(self, src)
    }

    /// A view over a brand-new store holding a copy of the visible
    /// elements, with `cap == len`. Never aliases this view.
    #[must_use]
    pub fn deep_copy(&self) -> Seq<T> {
        Self::over_vec(self.to_vec(), self.policy)
    }

    /// Deep copy of elements `start..end`.
    ///
    /// # Errors
    ///
    /// [`SeqError::SliceOutOfRange`] unless `start <= end <= len`.
    pub fn copy_range(&self, start: usize, end: usize) -> Result<Seq<T>, SeqError> {
        Ok(self.slice(start, end)?.deep_copy())
    }

    /// Remove the element at `index` by shifting the elements after it one
    /// slot left inside the same store.
    ///
    /// The returned view shares the store and has `len - 1` elements. This
    /// view keeps its length, so it now observes the shifted contents with
    /// its last element duplicated.
    ///
    /// # Errors
    ///
    /// [`SeqError::IndexOutOfRange`] unless `index < len`.
    pub fn remove_at(&self, index: usize) -> Result<Seq<T>, SeqError> {
        let store = self.store_for(index)?;
        let start = self.offset + index;
        store.copy_within(start + 1, start, self.len - index - 1);
        Ok(Self {
            store: Some(Rc::clone(store)),
            offset: self.offset,
            len: self.len - 1,
            cap: self.cap,
            policy: self.policy,
        })
    }
}

/// Copy `min(dst.len(), src.len())` elements from `src` into `dst`.
///
/// Both views may share a store with overlapping windows; the copy then
/// behaves as if `src` had been read completely first. Returns the number
/// of elements copied (zero when either view is nil).
pub fn copy<T: Clone>(dst: &Seq<T>, src: &Seq<T>) -> usize {
    let count = dst.len.min(src.len);
    let (Some(to), Some(from)) = (&dst.store, &src.store) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    if Rc::ptr_eq(to, from) {
        to.copy_within(src.offset, dst.offset, count);
    } else {
        from.with_range(src.offset..src.offset + count, |values| {
            to.write_from(dst.offset, values.iter().cloned());
        });
    }
    count
}

impl<T> Clone for Seq<T> {
    /// Clones the handle, not the elements: the clone aliases this view.
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            offset: self.offset,
            len: self.len,
            cap: self.cap,
            policy: self.policy,
        }
    }
}

impl<T> Default for Seq<T> {
    fn default() -> Self {
        Self::nil()
    }
}

impl<T> From<Vec<T>> for Seq<T> {
    fn from(values: Vec<T>) -> Self {
        Self::over_vec(values, GrowthPolicy::default())
    }
}

impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T: fmt::Debug> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_slice(|elems| {
            f.debug_struct("Seq")
                .field("store", &self.store_id())
                .field("offset", &self.offset)
                .field("len", &self.len)
                .field("cap", &self.cap)
                .field("elems", &elems)
                .finish()
        })
    }
}

/// Renders the visible elements as `[a b c]`.
impl<T: fmt::Display> fmt::Display for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_slice(|elems| {
            f.write_str("[")?;
            for (i, elem) in elems.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{elem}")?;
            }
            f.write_str("]")
        })
    }
}
