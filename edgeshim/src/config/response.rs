//! Response cache configuration.

use std::time::Duration;

use super::defaults::DEFAULT_PREVIOUS_ITEM_TTL_MS;

/// Configuration for [`crate::response_cache::ResponseCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCacheConfig {
    /// How long the most recent revalidatable entry is served without
    /// invoking the generator again
    previous_item_ttl: Duration,
}

impl ResponseCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the previous-item window. Zero disables reuse entirely.
    pub fn with_previous_item_ttl(mut self, ttl: Duration) -> Self {
        self.previous_item_ttl = ttl;
        self
    }

    pub fn previous_item_ttl(&self) -> Duration {
        self.previous_item_ttl
    }
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            previous_item_ttl: Duration::from_millis(DEFAULT_PREVIOUS_ITEM_TTL_MS),
        }
    }
}
