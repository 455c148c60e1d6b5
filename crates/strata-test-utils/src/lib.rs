//! Test fixtures and helpers for strata development.
//!
//! Builders for the standard sequences used across scenario tests, and
//! assertion helpers that spell out what "aliases" and "diverged" mean in
//! terms of observable writes rather than internal pointers.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt::Debug;
use std::hash::Hash;

use strata_map::AssocMap;
use strata_seq::Seq;

/// `[1 2 3 4 5 6 7 8 9]`, the nine-element literal most scenarios slice.
pub fn one_to_nine() -> Seq<i32> {
    Seq::from_values(1..=9)
}

/// Assert a view's visible elements, length, and capacity in one go.
#[track_caller]
pub fn assert_view<T: Clone + Default + PartialEq + Debug>(
    seq: &Seq<T>,
    elems: &[T],
    cap: usize,
) {
    assert_eq!(seq.to_vec(), elems, "elements");
    assert_eq!(seq.len(), elems.len(), "len");
    assert_eq!(seq.cap(), cap, "cap");
}

/// Assert that a write through `a` at `index` shows up in `b` at
/// `index_in_b`. Restores the original value afterwards.
#[track_caller]
pub fn assert_write_visible<T>(a: &Seq<T>, index: usize, b: &Seq<T>, index_in_b: usize, probe: T)
where
    T: Clone + Default + PartialEq + Debug,
{
    let original = a.get(index).expect("index in range of a");
    a.set(index, probe.clone()).expect("index in range of a");
    assert_eq!(b.get(index_in_b).expect("index in range of b"), probe);
    a.set(index, original).expect("index in range of a");
}

/// Assert that overwriting every element of `a` leaves `b` untouched.
#[track_caller]
pub fn assert_diverged<T>(a: &Seq<T>, b: &Seq<T>, probe: T)
where
    T: Clone + Default + PartialEq + Debug,
{
    let before = b.to_vec();
    for i in 0..a.len() {
        a.set(i, probe.clone()).expect("index in range");
    }
    assert_eq!(b.to_vec(), before, "write through one view leaked into the other");
}

/// Entries of `map` sorted by key, for order-independent comparisons.
pub fn sorted_entries<K, V>(map: &AssocMap<K, V>) -> Vec<(K, V)>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone,
{
    let mut entries = map.entries();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
