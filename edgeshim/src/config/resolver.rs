//! Resolver configuration.

use std::num::NonZeroUsize;

use super::defaults::DEFAULT_PAGE_PATH_CACHE_SIZE;

/// Configuration for [`crate::resolver::VirtualAssetResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    page_path_cache_capacity: NonZeroUsize,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page-path memo capacity. Zero is raised to one.
    pub fn with_page_path_cache_capacity(mut self, capacity: usize) -> Self {
        self.page_path_cache_capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        self
    }

    pub fn page_path_cache_capacity(&self) -> NonZeroUsize {
        self.page_path_cache_capacity
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            page_path_cache_capacity: NonZeroUsize::new(DEFAULT_PAGE_PATH_CACHE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(
            ResolverConfig::default().page_path_cache_capacity().get(),
            DEFAULT_PAGE_PATH_CACHE_SIZE
        );
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let config = ResolverConfig::new().with_page_path_cache_capacity(0);
        assert_eq!(config.page_path_cache_capacity().get(), 1);
    }
}
