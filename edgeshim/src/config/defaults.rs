//! Default values for every configuration setting.

use std::path::PathBuf;

use super::settings::{CacheSettings, ConfigFile, LoggingSettings, ServerSettings};
use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

/// How long the last generated response may be reused without regenerating.
pub const DEFAULT_PREVIOUS_ITEM_TTL_MS: u64 = 1_000;

/// Upper bound for the previous-item window.
pub const MAX_PREVIOUS_ITEM_TTL_MS: u64 = 60_000;

/// Capacity of the page-path memo.
pub const DEFAULT_PAGE_PATH_CACHE_SIZE: usize = 1_000;

/// Log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = crate::logging::DEFAULT_FILTER;

/// Clamp the previous-item window, warning when the configured value is
/// out of range.
pub(super) fn clamp_previous_item_ttl(value: u64) -> u64 {
    if value > MAX_PREVIOUS_ITEM_TTL_MS {
        tracing::warn!(
            requested = value,
            max = MAX_PREVIOUS_ITEM_TTL_MS,
            "previous_item_ttl_ms above maximum, clamping to {}",
            MAX_PREVIOUS_ITEM_TTL_MS
        );
        MAX_PREVIOUS_ITEM_TTL_MS
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                project_dir: "/".to_string(),
                dist_dir: None,
                assets_dir: None,
                locales: Vec::new(),
                default_locale: None,
                app_dir: false,
            },
            cache: CacheSettings {
                previous_item_ttl_ms: DEFAULT_PREVIOUS_ITEM_TTL_MS,
                page_path_cache_size: DEFAULT_PAGE_PATH_CACHE_SIZE,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
                filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}
