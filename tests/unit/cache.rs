//! Tests for `NavigationCache` eviction with explicit capture times.

use hyperlink_navigator::NavigationCache;
use std::time::{Duration, Instant};

fn key(n: usize) -> String {
    format!("http://localhost/{}", n)
}

#[test]
fn test_evicts_smallest_capture_time_not_first_inserted() {
    let t0 = Instant::now();
    let mut cache = NavigationCache::with_capacity(2);

    cache.set_at(key(1), "one", t0 + Duration::from_secs(10));
    cache.set_at(key(2), "two", t0);
    cache.set_at(key(3), "three", t0 + Duration::from_secs(20));

    assert!(cache.contains(&key(1)));
    assert!(!cache.contains(&key(2)));
    assert!(cache.contains(&key(3)));
}

#[test]
fn test_ties_evict_earliest_set() {
    let t0 = Instant::now();
    let mut cache = NavigationCache::with_capacity(2);

    for n in 1..=3 {
        cache.set_at(key(n), "page", t0);
    }

    let keys: Vec<&str> = cache.keys().collect();
    assert_eq!(keys, [key(2), key(3)]);
}

#[test]
fn test_replacing_refreshes_position_and_time() {
    let t0 = Instant::now();
    let mut cache = NavigationCache::with_capacity(2);

    cache.set_at(key(1), "old", t0);
    cache.set_at(key(2), "two", t0 + Duration::from_secs(1));
    cache.set_at(key(1), "new", t0 + Duration::from_secs(2));
    cache.set_at(key(3), "three", t0 + Duration::from_secs(3));

    assert_eq!(cache.get(&key(1)).unwrap().raw_content(), "new");
    assert!(!cache.contains(&key(2)));
    assert_eq!(cache.stats().replacements, 1);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_shrinking_capacity_applies_on_next_set() {
    let t0 = Instant::now();
    let mut cache = NavigationCache::with_capacity(5);
    for n in 0..5 {
        cache.set_at(key(n), "page", t0 + Duration::from_secs(n as u64));
    }

    cache.configure_capacity(2);
    assert_eq!(cache.len(), 5);

    cache.set_at(key(9), "page", t0 + Duration::from_secs(9));
    let keys: Vec<&str> = cache.keys().collect();
    assert_eq!(keys, [key(4), key(9)]);
}

#[test]
fn test_freshness_window() {
    let t0 = Instant::now();
    let mut cache = NavigationCache::new();
    cache.set_at(key(1), "page", t0);

    let window = Duration::from_secs(5);
    assert!(cache.is_fresh(&key(1), t0 + Duration::from_secs(4), window));
    assert!(!cache.is_fresh(&key(1), t0 + Duration::from_secs(5), window));
    assert!(!cache.is_fresh(&key(2), t0, window));
}
