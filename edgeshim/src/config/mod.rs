//! Configuration for edgeshim components.
//!
//! Each component takes its own small config struct with builder-style
//! setters; [`ConfigFile`] maps an INI file onto all of them at once.
//!
//! ```
//! use edgeshim::config::{ResolverConfig, ResponseCacheConfig};
//! use std::time::Duration;
//!
//! let cache = ResponseCacheConfig::new().with_previous_item_ttl(Duration::from_millis(500));
//! let resolver = ResolverConfig::new().with_page_path_cache_capacity(256);
//!
//! assert_eq!(cache.previous_item_ttl(), Duration::from_millis(500));
//! assert_eq!(resolver.page_path_cache_capacity().get(), 256);
//! ```

mod defaults;
mod file;
mod parser;
mod resolver;
mod response;
mod settings;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PAGE_PATH_CACHE_SIZE, DEFAULT_PREVIOUS_ITEM_TTL_MS,
    MAX_PREVIOUS_ITEM_TTL_MS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use resolver::ResolverConfig;
pub use response::ResponseCacheConfig;
pub use settings::{CacheSettings, ConfigFile, LoggingSettings, ServerSettings};
