//! End-to-end scenarios for sequence aliasing and map initialization.

use strata::prelude::*;
use strata_test_utils::{
    assert_diverged, assert_view, assert_write_visible, one_to_nine, sorted_entries,
};

// ── Sequences ───────────────────────────────────────────────────────

#[test]
fn fill_then_overflow_reallocates() {
    let seq: Seq<i32> = Seq::with_capacity(3);
    assert_view(&seq, &[], 3);

    let filled = seq.append([4, 5, 6]);
    assert_view(&filled, &[4, 5, 6], 3);
    assert!(filled.shares_store(&seq));

    let grown = filled.append([7]);
    assert_view(&grown, &[4, 5, 6, 7], 6);
    assert_diverged(&grown, &filled, -1);
}

#[test]
fn overlapping_slices_share_writes() {
    let v1 = one_to_nine();
    let v2 = v1.slice(0, 8).unwrap();
    let v3 = v1.slice(1, 6).unwrap();
    assert_view(&v2, &[1, 2, 3, 4, 5, 6, 7, 8], 9);
    assert_view(&v3, &[2, 3, 4, 5, 6], 8);

    v1.set(2, 666).unwrap();
    assert_eq!(v2.get(2), Ok(666));
    assert_eq!(v3.get(1), Ok(666));

    assert_write_visible(&v2, 3, &v3, 2, 999);
    assert_write_visible(&v3, 0, &v1, 1, -5);
}

#[test]
fn copy_into_fresh_view_stops_aliasing() {
    let all = one_to_nine();
    let window = all.slice(1, 6).unwrap();

    let copied: Seq<i32> = Seq::make(window.len(), window.len()).unwrap();
    assert_eq!(copy(&copied, &window), 5);
    assert_view(&copied, &[2, 3, 4, 5, 6], 5);

    assert_diverged(&copied, &all, 888);
    assert!(!copied.aliases(&window));
}

#[test]
fn remove_from_window() {
    let all = Seq::from_values([11, 22, 33, 44, 55]);
    let removed = all.remove_at(2).unwrap();
    assert_view(&removed, &[11, 22, 44, 55], 5);
    assert!(removed.shares_store(&all));
}

#[test]
fn trim_head_and_tail() {
    let seq = Seq::from_values([1, 2, 3, 4, 5, 6, 7]);
    let seq = seq.remove_at(2).unwrap();
    let seq = seq.slice_from(1).unwrap();
    assert_view(&seq, &[2, 4, 5, 6, 7], 6);
    let seq = seq.slice_to(seq.len() - 1).unwrap();
    assert_view(&seq, &[2, 4, 5, 6], 6);
}

#[test]
fn deep_copy_of_aliased_view_is_independent() {
    let all = one_to_nine();
    let a = all.slice(2, 7).unwrap();
    let b = a.deep_copy();
    assert_eq!(b.to_vec(), a.to_vec());
    assert_diverged(&b, &all, 0);
}

#[test]
fn nil_versus_empty() {
    let declared: Seq<i32> = Seq::default();
    assert!(declared.is_nil());
    assert!(!Seq::<i32>::with_capacity(0).is_nil());
    assert!(!Seq::<i32>::from_values([]).is_nil());

    // Appending to nil allocates; the result is no longer nil.
    let first = declared.append([1]);
    assert!(!first.is_nil());
    assert_eq!(first.to_string(), "[1]");
}

// ── Maps ────────────────────────────────────────────────────────────

#[test]
fn nil_map_contract() {
    let nil: AssocMap<String, i32> = AssocMap::nil();
    for key in ["a", "b", ""] {
        assert_eq!(nil.get(key), None);
    }
    assert_eq!(
        nil.set("a".to_string(), 1),
        Err(MapError::UninitializedWrite)
    );

    let map = AssocMap::make();
    map.set("a".to_string(), 1).unwrap();
    assert_eq!(map.get("a"), Some(1));
}

#[test]
fn map_passed_by_handle_mutates_caller() {
    let map = AssocMap::from_entries((1..=6).map(|k| (k, format!("v{k}"))));

    fn suffix_keys(m: AssocMap<i32, String>) {
        m.for_each(|k, v| m.set(*k, format!("{v}-{k}")).unwrap());
    }
    suffix_keys(map.clone());

    let entries = sorted_entries(&map);
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0], (1, "v1-1".to_string()));
    assert_eq!(entries[5], (6, "v6-6".to_string()));
}

#[test]
fn concurrent_map_basic_range() {
    let store = ConcurrentMap::new();
    store.set("key1", 123);
    store.set("key2", 456);
    store.set("key3", 789);
    assert_eq!(store.get("key1"), Some(123));

    let mut total = 0;
    store.range(|_, v| {
        total += v;
        std::ops::ControlFlow::Continue(())
    });
    assert_eq!(total, 123 + 456 + 789);
}
