//! Single-threaded associative map with an explicit uninitialized state.
//!
//! An [`AssocMap`] handle is either *nil* (never initialized: reads find
//! nothing, writes fail with [`MapError::UninitializedWrite`]) or
//! *initialized*. Initialized handles have reference semantics: cloning a
//! handle, or passing a clone to a function, shares the entries, so a
//! write through any clone is visible through all of them.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;
use strata_core::MapError;

type Entries<K, V> = Rc<RefCell<IndexMap<K, V>>>;

/// Storage state of an [`AssocMap`] handle.
enum MapState<K, V> {
    /// Never allocated. Reads return not-found; writes are rejected.
    Uninitialized,
    /// Allocated entries, shared by every clone of the handle.
    Initialized(Entries<K, V>),
}

/// A key-unique mapping whose iteration order is unspecified.
///
/// Callers must not rely on the order of [`for_each`](AssocMap::for_each)
/// or [`entries`](AssocMap::entries); deletions reorder the remaining
/// entries.
pub struct AssocMap<K, V> {
    state: MapState<K, V>,
}

impl<K, V> AssocMap<K, V> {
    /// A nil map handle.
    pub fn nil() -> Self {
        Self {
            state: MapState::Uninitialized,
        }
    }

    /// Whether this handle was never initialized (or was reset to nil).
    pub fn is_nil(&self) -> bool {
        matches!(self.state, MapState::Uninitialized)
    }

    /// Detach this handle from its entries, leaving it nil.
    ///
    /// Other clones keep the entries.
    pub fn reset_to_nil(&mut self) {
        self.state = MapState::Uninitialized;
    }

    /// Number of entries (zero for a nil map).
    pub fn len(&self) -> usize {
        match &self.state {
            MapState::Uninitialized => 0,
            MapState::Initialized(entries) => entries.borrow().len(),
        }
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry. No-op on a nil map.
    pub fn clear(&self) {
        if let MapState::Initialized(entries) = &self.state {
            entries.borrow_mut().clear();
        }
    }

    /// Whether both handles share the same entries.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (MapState::Initialized(a), MapState::Initialized(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<K: Hash + Eq, V> AssocMap<K, V> {
    /// An initialized, empty map.
    pub fn make() -> Self {
        Self::with_capacity(0)
    }

    /// An initialized, empty map with room for `capacity` entries before
    /// rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: MapState::Initialized(Rc::new(RefCell::new(IndexMap::with_capacity(
                capacity,
            )))),
        }
    }

    /// An initialized map holding `entries`; later duplicates win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            state: MapState::Initialized(Rc::new(RefCell::new(entries.into_iter().collect()))),
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// # Errors
    ///
    /// [`MapError::UninitializedWrite`] if the handle is nil.
    pub fn set(&self, key: K, value: V) -> Result<(), MapError> {
        match &self.state {
            MapState::Uninitialized => Err(MapError::UninitializedWrite),
            MapState::Initialized(entries) => {
                entries.borrow_mut().insert(key, value);
                Ok(())
            }
        }
    }

    /// Remove `key`, returning its value. No-op when absent or nil.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.state {
            MapState::Uninitialized => None,
            MapState::Initialized(entries) => entries.borrow_mut().swap_remove(key),
        }
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.state {
            MapState::Uninitialized => false,
            MapState::Initialized(entries) => entries.borrow().contains_key(key),
        }
    }
}

impl<K: Hash + Eq, V: Clone> AssocMap<K, V> {
    /// Look up `key`. Never fails; a nil map finds nothing.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.state {
            MapState::Uninitialized => None,
            MapState::Initialized(entries) => entries.borrow().get(key).cloned(),
        }
    }

    /// Look up `key`, yielding the zero value when it is absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> AssocMap<K, V> {
    /// Clone all entries out, in unspecified order.
    pub fn entries(&self) -> Vec<(K, V)> {
        match &self.state {
            MapState::Uninitialized => Vec::new(),
            MapState::Initialized(entries) => entries
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Visit every entry in unspecified order.
    ///
    /// The visitor works on a copy taken before the first call, so it may
    /// write to this map; keys it adds are not visited.
    pub fn for_each(&self, mut visit: impl FnMut(&K, &V)) {
        for (key, value) in self.entries() {
            visit(&key, &value);
        }
    }
}

impl<K, V> Clone for AssocMap<K, V> {
    /// Clones the handle; an initialized clone shares the entries.
    fn clone(&self) -> Self {
        let state = match &self.state {
            MapState::Uninitialized => MapState::Uninitialized,
            MapState::Initialized(entries) => MapState::Initialized(Rc::clone(entries)),
        };
        Self { state }
    }
}

impl<K, V> Default for AssocMap<K, V> {
    fn default() -> Self {
        Self::nil()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for AssocMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AssocMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            MapState::Uninitialized => f.write_str("AssocMap(nil)"),
            MapState::Initialized(entries) => {
                f.debug_map().entries(entries.borrow().iter()).finish()
            }
        }
    }
}
