//! Bounded memo of page-path resolutions.
//!
//! The manifests are immutable for the lifetime of a deployed build, so an
//! entry never goes stale; the only way out is LRU eviction. Misses are
//! memoized too.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

/// Memo key: the page as requested plus everything that changes the answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePathKey {
    pub page: String,
    pub locales: Option<Vec<String>>,
    pub app_variant: bool,
}

impl PagePathKey {
    pub fn new(page: &str, locales: Option<&[String]>, app_variant: bool) -> Self {
        Self {
            page: page.to_string(),
            locales: locales.map(<[String]>::to_vec),
            app_variant,
        }
    }
}

/// Hit/miss counters for the memo.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PathCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl PathCacheStats {
    /// Fraction of lookups answered from the memo (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU of `PagePathKey` → resolved path (`None` = page not found).
pub struct ModulePathCache {
    entries: Mutex<LruCache<PagePathKey, Option<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModulePathCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Memoized result, refreshing its recency. The outer `Option` is
    /// "memoized or not", the inner one is the resolution itself.
    pub fn get(&self, key: &PagePathKey) -> Option<Option<String>> {
        let found = self.entries.lock().get(key).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn insert(&self, key: PagePathKey, resolved: Option<String>) {
        self.entries.lock().put(key, resolved);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn stats(&self) -> PathCacheStats {
        let entries = self.entries.lock();
        PathCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: entries.len(),
            capacity: entries.cap().get(),
        }
    }
}
