//! Integration test: many threads hammering one `ConcurrentMap`.
//!
//! Writers own disjoint key ranges, so the final contents are exact even
//! though the interleaving is not. Readers and a ranging thread run
//! alongside them and must never block indefinitely or observe a value
//! that was never written.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};

use strata_map::ConcurrentMap;

const WRITERS: u64 = 8;
const KEYS_PER_WRITER: u64 = 500;

#[test]
fn disjoint_writers_produce_exact_contents() {
    let map = ConcurrentMap::new();
    std::thread::scope(|s| {
        for w in 0..WRITERS {
            let map = &map;
            s.spawn(move || {
                for i in 0..KEYS_PER_WRITER {
                    map.set(w * KEYS_PER_WRITER + i, w);
                }
            });
        }
    });
    assert_eq!(map.len() as u64, WRITERS * KEYS_PER_WRITER);
    for key in 0..WRITERS * KEYS_PER_WRITER {
        assert_eq!(map.get(&key), Some(key / KEYS_PER_WRITER));
    }
}

#[test]
fn readers_and_range_alongside_writers() {
    let map: ConcurrentMap<u64, u64> = ConcurrentMap::with_shard_count(4);
    let ranged = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for w in 0..WRITERS {
            let map = &map;
            s.spawn(move || {
                for i in 0..KEYS_PER_WRITER {
                    let key = w * KEYS_PER_WRITER + i;
                    map.set(key, key * 2);
                    if i % 3 == 0 {
                        map.delete(&key);
                    }
                }
            });
        }
        let map = &map;
        s.spawn(move || {
            for key in 0..WRITERS * KEYS_PER_WRITER {
                if let Some(value) = map.get(&key) {
                    assert_eq!(value, key * 2);
                }
            }
        });
        let ranged = &ranged;
        s.spawn(move || {
            map.range(|k, v| {
                assert_eq!(*v, k * 2);
                ranged.fetch_add(1, Ordering::Relaxed);
                ControlFlow::Continue(())
            });
        });
    });

    let expected = (0..WRITERS * KEYS_PER_WRITER)
        .filter(|key| (key % KEYS_PER_WRITER) % 3 != 0)
        .count();
    assert_eq!(map.len(), expected);
    assert!(ranged.load(Ordering::Relaxed) <= WRITERS as usize * KEYS_PER_WRITER as usize);
}

#[test]
fn load_or_store_race_has_one_winner() {
    let map: ConcurrentMap<&str, usize> = ConcurrentMap::new();
    let winners = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for t in 0..16 {
            let (map, winners) = (&map, &winners);
            s.spawn(move || {
                let (_, loaded) = map.load_or_store("leader", t);
                if !loaded {
                    winners.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });
    assert_eq!(winners.load(Ordering::Relaxed), 1);
    assert!(map.get("leader").is_some());
}
