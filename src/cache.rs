//! Page snapshot caching.
//!
//! This module provides [`NavigationCache`]: a bounded store of previously
//! rendered pages keyed by absolute URL. It uses the [`lru`] crate in
//! unbounded mode purely for its insertion-ordered map; eviction is done by
//! hand so that:
//!
//! - the victim is always the entry with the smallest `captured_at`, ties
//!   going to the entry that was set first;
//! - reads never reorder anything (revisiting a page does not keep it alive,
//!   only re-fetching it does);
//! - shrinking the capacity never evicts retroactively, the next `set` does.
//!
//! [`CacheStats`] tracks insertions, replacements, and evictions.
//!
//! # Examples
//!
//! ```
//! use hyperlink_navigator::cache::NavigationCache;
//!
//! let mut cache = NavigationCache::with_capacity(2);
//! cache.set("http://localhost/a", "<html>a</html>");
//! cache.set("http://localhost/b", "<html>b</html>");
//! cache.set("http://localhost/c", "<html>c</html>");
//!
//! assert!(cache.get("http://localhost/a").is_none());
//! assert_eq!(cache.len(), 2);
//! assert_eq!(cache.stats().evictions, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::time::{Duration, Instant};

/// A rendered page snapshot. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    key: String,
    raw_content: String,
    captured_at: Instant,
}

impl CacheEntry {
    /// Absolute URL the snapshot was taken for.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw document markup.
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// When the snapshot was stored.
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// Time elapsed between capture and `now`; zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.captured_at)
    }
}

/// Counters for cache writes and evictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries stored for a previously unseen key.
    pub insertions: usize,
    /// Entries that replaced an existing snapshot for the same key.
    pub replacements: usize,
    /// Entries removed to respect the capacity bound.
    pub evictions: usize,
}

/// Bounded page cache, oldest-capture-first eviction.
#[derive(Debug)]
pub struct NavigationCache {
    pages: LruCache<String, CacheEntry>,
    capacity: usize,
    stats: CacheStats,
}

impl NavigationCache {
    /// Number of pages kept when no capacity is configured.
    pub const DEFAULT_CAPACITY: usize = 20;

    /// Create a cache holding at most [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) pages.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` pages. Zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pages: LruCache::unbounded(),
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Look up the snapshot stored for `url`.
    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.pages.peek(url)
    }

    /// Check whether a snapshot for `url` exists.
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains(url)
    }

    /// Check whether a snapshot for `url` was captured less than `window` before `now`.
    pub fn is_fresh(&self, url: &str, now: Instant, window: Duration) -> bool {
        self.get(url).is_some_and(|entry| entry.age(now) < window)
    }

    /// Store `raw_content` for `url`, captured now.
    pub fn set(&mut self, url: impl Into<String>, raw_content: impl Into<String>) {
        self.set_at(url, raw_content, Instant::now());
    }

    /// Store `raw_content` for `url` with an explicit capture time, then evict
    /// until the capacity bound holds.
    pub fn set_at(
        &mut self,
        url: impl Into<String>,
        raw_content: impl Into<String>,
        captured_at: Instant,
    ) {
        let key = url.into();
        let entry = CacheEntry {
            key: key.clone(),
            raw_content: raw_content.into(),
            captured_at,
        };

        // Drop the old entry first so the replacement moves to the back of the
        // enumeration order like any fresh insertion.
        if self.pages.pop(&key).is_some() {
            self.stats.replacements += 1;
            trace_log!("Replacing cached page '{}'", key);
        } else {
            self.stats.insertions += 1;
            trace_log!("Caching page '{}'", key);
        }
        self.pages.push(key, entry);

        self.trim();
    }

    /// Change the capacity bound for subsequent `set` calls and return it.
    ///
    /// Existing entries above the new bound stay until the next `set`.
    pub fn configure_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        debug_log!("Page cache capacity set to {}", self.capacity);
        self.capacity
    }

    /// Current capacity bound.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no pages are stored.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Absolute URLs currently cached, oldest insertion first.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().rev().map(|(key, _)| key.as_str())
    }

    /// Remove every stored page.
    pub fn clear(&mut self) {
        let removed = self.pages.len();
        self.pages.clear();
        debug_log!("Page cache cleared: {} entries removed", removed);
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn trim(&mut self) {
        while self.pages.len() > self.capacity {
            let Some(victim) = self.oldest_key() else {
                break;
            };
            self.pages.pop(&victim);
            self.stats.evictions += 1;
            debug_log!(
                "Evicted cached page '{}' ({} / {} entries)",
                victim,
                self.pages.len(),
                self.capacity
            );
        }
    }

    /// Key with the smallest capture time; the first one set wins ties.
    fn oldest_key(&self) -> Option<String> {
        let mut oldest: Option<&CacheEntry> = None;
        for (_, entry) in self.pages.iter().rev() {
            match oldest {
                Some(current) if entry.captured_at >= current.captured_at => {}
                _ => oldest = Some(entry),
            }
        }
        oldest.map(|entry| entry.key.clone())
    }
}

impl Default for NavigationCache {
    fn default() -> Self {
        Self::new()
    }
}
