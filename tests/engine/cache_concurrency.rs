//! Schema cache under concurrent access

use crate::common::*;
use schemata::SchemaCache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn variant(tag: usize) -> Type {
    Type::builder("product")
        .field(format!("v{}", tag), field(PrimitiveKind::String))
        .build()
        .unwrap()
}

/// Concurrent first inserts agree on a single winner
#[test]
fn insert_if_absent_has_one_winner() {
    let cache = Arc::new(SchemaCache::new(true));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|tag| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.insert_if_absent(variant(tag))
            })
        })
        .collect();

    let results: Vec<Arc<Type>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winner = cache.get("product").unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(result, &winner));
    }
    assert_eq!(cache.len(), 1);
}

/// Concurrent loads of the same name all observe the same description
#[test]
fn concurrent_loads_share_one_entry() {
    let cache = Arc::new(SchemaCache::new(true));
    let barrier = Arc::new(Barrier::new(8));
    let loads = Arc::new(AtomicU64::new(0));

    let handles: Vec<_> = (0..8)
        .map(|tag| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            let loads = Arc::clone(&loads);
            thread::spawn(move || {
                barrier.wait();
                cache
                    .get_or_load("product", |_| {
                        loads.fetch_add(1, Ordering::Relaxed);
                        Ok(variant(tag))
                    })
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<Arc<Type>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(loads.load(Ordering::Relaxed) >= 1);
    let first = &results[0];
    assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
    assert_eq!(cache.len(), 1);
}

/// Invalidation racing with readers never leaves a torn state
#[test]
fn invalidation_races_with_loads() {
    let cache = Arc::new(SchemaCache::new(true));
    let barrier = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|tag| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..200 {
                    let loaded = cache.get_or_load("product", |_| Ok(variant(tag))).unwrap();
                    assert_eq!(loaded.name(), "product");
                }
            })
        })
        .collect();

    let invalidator = {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                cache.invalidate_all();
            }
        })
    };

    for handle in readers {
        handle.join().unwrap();
    }
    invalidator.join().unwrap();

    assert_eq!(cache.generation(), 50);
    assert!(cache.len() <= 1);
    cache.invalidate_all();
    assert!(cache.is_empty());
}

/// A load that read before an invalidation does not repopulate the cache
#[test]
fn stale_load_is_not_stored() {
    let cache = Arc::new(SchemaCache::new(true));
    let loading = Arc::new(Barrier::new(2));
    let invalidated = Arc::new(Barrier::new(2));

    let loader = {
        let cache = Arc::clone(&cache);
        let loading = Arc::clone(&loading);
        let invalidated = Arc::clone(&invalidated);
        thread::spawn(move || {
            cache
                .get_or_load("product", |_| {
                    loading.wait();
                    invalidated.wait();
                    Ok(variant(0))
                })
                .unwrap()
        })
    };

    loading.wait();
    cache.invalidate_all();
    invalidated.wait();

    let stale = loader.join().unwrap();
    assert!(stale.field("v0").is_some());
    assert!(cache.get("product").is_none());

    let fresh = cache.get_or_load("product", |_| Ok(variant(1))).unwrap();
    assert!(fresh.field("v1").is_some());
}
