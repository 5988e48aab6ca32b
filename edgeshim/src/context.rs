//! Per-process server context.
//!
//! Everything the resolver needs to find build output: the asset store, the
//! project directory the store's keys are relative to, the dist directory,
//! and the i18n locales. Built once by the host and shared behind an `Arc`;
//! there is no global "init" step to forget.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::assets::{path, AssetStore};

/// Default dist directory name, relative to the project directory.
pub const DEFAULT_DIST_DIR: &str = ".next";

/// Errors from [`ServerContextBuilder::build`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("project directory must be an absolute logical path, got `{0}`")]
    RelativeProjectDir(String),

    #[error("dist directory `{dist_dir}` is outside project directory `{project_dir}`")]
    DistOutsideProject { project_dir: String, dist_dir: String },

    #[error("locale list contains an empty entry")]
    EmptyLocale,
}

/// Immutable configuration shared by the resolver and the server façade.
#[derive(Clone)]
pub struct ServerContext {
    store: Arc<dyn AssetStore>,
    project_dir: String,
    dist_dir: String,
    locales: Option<Vec<String>>,
    default_locale: Option<String>,
    has_app_dir: bool,
}

impl ServerContext {
    /// Start building a context around `store`.
    pub fn builder(store: Arc<dyn AssetStore>) -> ServerContextBuilder {
        ServerContextBuilder {
            store,
            project_dir: "/".to_string(),
            dist_dir: None,
            locales: None,
            default_locale: None,
            has_app_dir: false,
        }
    }

    pub fn store(&self) -> &dyn AssetStore {
        self.store.as_ref()
    }

    /// Absolute logical project directory (asset keys are relative to it).
    pub fn project_dir(&self) -> &str {
        &self.project_dir
    }

    /// Absolute logical dist directory.
    pub fn dist_dir(&self) -> &str {
        &self.dist_dir
    }

    pub fn locales(&self) -> Option<&[String]> {
        self.locales.as_deref()
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.default_locale.as_deref()
    }

    /// Whether the build has an app directory (and an app-paths manifest).
    pub fn has_app_dir(&self) -> bool {
        self.has_app_dir
    }

    /// Asset key for an absolute logical path.
    pub fn asset_key(&self, logical_path: &str) -> String {
        path::asset_key(&self.project_dir, logical_path)
    }
}

impl fmt::Debug for ServerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerContext")
            .field("project_dir", &self.project_dir)
            .field("dist_dir", &self.dist_dir)
            .field("locales", &self.locales)
            .field("default_locale", &self.default_locale)
            .field("has_app_dir", &self.has_app_dir)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServerContext`].
///
/// ```
/// use edgeshim::assets::InMemoryAssetStore;
/// use edgeshim::context::ServerContext;
/// use std::sync::Arc;
///
/// let context = ServerContext::builder(Arc::new(InMemoryAssetStore::new()))
///     .project_dir("/app")
///     .locales(["en-US", "fr"])
///     .build()
///     .unwrap();
///
/// assert_eq!(context.dist_dir(), "/app/.next");
/// assert_eq!(context.default_locale(), Some("en-US"));
/// ```
pub struct ServerContextBuilder {
    store: Arc<dyn AssetStore>,
    project_dir: String,
    dist_dir: Option<String>,
    locales: Option<Vec<String>>,
    default_locale: Option<String>,
    has_app_dir: bool,
}

impl ServerContextBuilder {
    pub fn project_dir(mut self, dir: impl Into<String>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Dist directory; relative values are resolved against the project
    /// directory. Defaults to `.next`.
    pub fn dist_dir(mut self, dir: impl Into<String>) -> Self {
        self.dist_dir = Some(dir.into());
        self
    }

    /// Configured i18n locales. The first one is the default unless
    /// [`default_locale`](Self::default_locale) is set.
    pub fn locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locales: Vec<String> = locales.into_iter().map(Into::into).collect();
        self.locales = if locales.is_empty() {
            None
        } else {
            Some(locales)
        };
        self
    }

    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn app_dir(mut self, enabled: bool) -> Self {
        self.has_app_dir = enabled;
        self
    }

    pub fn build(self) -> Result<ServerContext, ContextError> {
        if !self.project_dir.starts_with('/') {
            return Err(ContextError::RelativeProjectDir(self.project_dir));
        }
        let project_dir = path::normalize(path::remove_trailing_slash(&self.project_dir));

        let dist_dir = match self.dist_dir {
            Some(dir) if dir.starts_with('/') => path::normalize(&dir),
            Some(dir) => path::join(&project_dir, &dir),
            None => path::join(&project_dir, DEFAULT_DIST_DIR),
        };
        let dist_dir = path::remove_trailing_slash(&dist_dir).to_string();

        let from_project = path::relative(&project_dir, &dist_dir);
        if from_project == ".." || from_project.starts_with("../") {
            return Err(ContextError::DistOutsideProject {
                project_dir,
                dist_dir,
            });
        }

        if let Some(locales) = &self.locales {
            if locales.iter().any(|l| l.trim().is_empty()) {
                return Err(ContextError::EmptyLocale);
            }
        }

        let default_locale = self
            .default_locale
            .or_else(|| self.locales.as_ref().and_then(|l| l.first().cloned()));

        Ok(ServerContext {
            store: self.store,
            project_dir,
            dist_dir,
            locales: self.locales,
            default_locale,
            has_app_dir: self.has_app_dir,
        })
    }
}
