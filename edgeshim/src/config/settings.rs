//! Settings structs mirrored from the INI sections.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::resolver::ResolverConfig;
use super::response::ResponseCacheConfig;
use crate::assets::AssetStore;
use crate::context::{ContextError, ServerContext};

/// Whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Logical project directory the asset keys are relative to
    pub project_dir: String,
    /// Dist directory, relative to `project_dir` unless absolute
    pub dist_dir: Option<String>,
    /// Host directory loaded into the in-memory asset store
    pub assets_dir: Option<PathBuf>,
    /// i18n locales, first is the default unless `default_locale` is set
    pub locales: Vec<String>,
    pub default_locale: Option<String>,
    /// Whether the build has an app directory
    pub app_dir: bool,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub previous_item_ttl_ms: u64,
    pub page_path_cache_size: usize,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
    pub filter: String,
}

impl ConfigFile {
    pub fn response_cache_config(&self) -> ResponseCacheConfig {
        ResponseCacheConfig::new()
            .with_previous_item_ttl(Duration::from_millis(self.cache.previous_item_ttl_ms))
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new().with_page_path_cache_capacity(self.cache.page_path_cache_size)
    }

    /// Build the server context for `store` from the `[server]` section.
    pub fn server_context(&self, store: Arc<dyn AssetStore>) -> Result<ServerContext, ContextError> {
        let mut builder = ServerContext::builder(store)
            .project_dir(self.server.project_dir.clone())
            .locales(self.server.locales.clone())
            .app_dir(self.server.app_dir);
        if let Some(dist) = &self.server.dist_dir {
            builder = builder.dist_dir(dist.clone());
        }
        if let Some(locale) = &self.server.default_locale {
            builder = builder.default_locale(locale.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssetStore;

    #[test]
    fn test_default_component_configs() {
        let config = ConfigFile::default();
        assert_eq!(
            config.response_cache_config(),
            ResponseCacheConfig::default()
        );
        assert_eq!(config.resolver_config(), ResolverConfig::default());
    }

    #[test]
    fn test_server_context_from_settings() {
        let mut config = ConfigFile::default();
        config.server.project_dir = "/site".to_string();
        config.server.dist_dir = Some("out".to_string());
        config.server.locales = vec!["en".to_string(), "nl".to_string()];
        config.server.default_locale = Some("nl".to_string());
        config.server.app_dir = true;

        let context = config
            .server_context(Arc::new(InMemoryAssetStore::new()))
            .unwrap();

        assert_eq!(context.dist_dir(), "/site/out");
        assert_eq!(context.default_locale(), Some("nl"));
        assert!(context.has_app_dir());
    }
}
