//! Response cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of [`super::ResponseCache`] activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseCacheStats {
    /// Calls to `get`, keyed or not
    pub total_requests: u64,
    /// Requests that joined an in-flight generation
    pub coalesced_requests: u64,
    /// Requests answered from the previous item
    pub previous_item_hits: u64,
    /// Keyed generations started
    pub generations: u64,
    /// Generations for requests without a cache key
    pub uncached_generations: u64,
    /// Generations that failed before publishing a value
    pub generation_failures: u64,
    /// Generations that failed after publishing a value
    pub background_failures: u64,
}

impl ResponseCacheStats {
    /// Share of requests that did not start a generation (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.coalesced_requests + self.previous_item_hits) as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    total_requests: AtomicU64,
    coalesced_requests: AtomicU64,
    previous_item_hits: AtomicU64,
    generations: AtomicU64,
    uncached_generations: AtomicU64,
    generation_failures: AtomicU64,
    background_failures: AtomicU64,
}

impl StatsCounters {
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) -> u64 {
        self.coalesced_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_previous_hit(&self) {
        self.previous_item_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation(&self) {
        self.generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_uncached(&self) {
        self.uncached_generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_background_failure(&self) {
        self.background_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResponseCacheStats {
        ResponseCacheStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            coalesced_requests: self.coalesced_requests.load(Ordering::Relaxed),
            previous_item_hits: self.previous_item_hits.load(Ordering::Relaxed),
            generations: self.generations.load(Ordering::Relaxed),
            uncached_generations: self.uncached_generations.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
            background_failures: self.background_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of_empty_stats_is_zero() {
        assert_eq!(ResponseCacheStats::default().coalescing_ratio(), 0.0);
    }

    #[test]
    fn test_ratio_counts_coalesced_and_previous_hits() {
        let counters = StatsCounters::default();
        for _ in 0..4 {
            counters.record_request();
        }
        counters.record_generation();
        counters.record_coalesced();
        counters.record_coalesced();
        counters.record_previous_hit();

        let stats = counters.snapshot();
        assert_eq!(stats.total_requests, 4);
        assert!((stats.coalescing_ratio() - 0.75).abs() < 0.001);
    }
}
