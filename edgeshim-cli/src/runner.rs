//! CLI runner for common setup.
//!
//! Loads the config file, initializes logging and builds the resolver over
//! the build directory so command handlers only deal with lookups.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use edgeshim::assets::InMemoryAssetStore;
use edgeshim::config::ConfigFile;
use edgeshim::logging::{init_logging_full, LoggingGuard};
use edgeshim::resolver::VirtualAssetResolver;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    resolver: VirtualAssetResolver,
}

impl CliRunner {
    /// Load configuration, start logging and load the build directory.
    ///
    /// `assets_dir` overrides `[server] assets_dir`; `debug` overrides the
    /// configured log filter.
    pub fn new(config_path: Option<&Path>, assets_dir: Option<PathBuf>, debug: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let filter = if debug {
            "debug"
        } else {
            config.logging.filter.as_str()
        };
        // stdout carries command output, so logs only go to the file
        let logging_guard = init_logging_full(&config.logging.directory, &config.logging.file, false, filter)
            .map_err(CliError::LoggingInit)?;

        let assets_dir = assets_dir
            .or_else(|| config.server.assets_dir.clone())
            .ok_or(CliError::MissingAssetsDir)?;

        let store = InMemoryAssetStore::from_directory(&assets_dir)?;
        info!(
            assets_dir = %assets_dir.display(),
            assets = store.asset_count(),
            "Loaded build directory"
        );

        let context = config.server_context(Arc::new(store))?;
        let resolver = VirtualAssetResolver::new(Arc::new(context), config.resolver_config());

        Ok(Self {
            logging_guard,
            resolver,
        })
    }

    pub fn resolver(&self) -> &VirtualAssetResolver {
        &self.resolver
    }

    /// Absolute logical path for `path`; relative paths are taken from the
    /// project directory.
    pub fn logical_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            edgeshim::assets::path::join(self.resolver.context().project_dir(), path)
        }
    }
}
