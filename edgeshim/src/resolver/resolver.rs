//! [`VirtualAssetResolver`]: framework file reads served from the asset store.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::ResolveError;
use super::manifest::{
    BuildManifest, PagesManifest, APP_PATHS_MANIFEST, BUILD_ID_FILE, BUILD_MANIFEST,
    PAGES_MANIFEST, SERVER_DIRECTORY,
};
use super::page_path::{denormalize_page_path, normalize_locale_path, normalize_page_path};
use super::path_cache::{ModulePathCache, PagePathKey, PathCacheStats};
use crate::assets::{path, AssetRecord, ModuleRecord};
use crate::config::ResolverConfig;
use crate::context::ServerContext;

/// A page loaded through [`VirtualAssetResolver::require_page`].
#[derive(Debug, Clone)]
pub enum LoadedPage {
    /// Prerendered HTML
    Static(String),
    /// Executable page module
    Module(ModuleRecord),
}

/// Resolves logical build-output paths against the context's asset store.
///
/// All paths taken and returned are absolute logical paths (for example
/// `/app/.next/server/pages/index.js`); they are turned into store keys
/// relative to the project directory internally.
///
/// # Example
///
/// ```
/// use edgeshim::assets::{AssetRecord, InMemoryAssetStore, ModuleRecord};
/// use edgeshim::config::ResolverConfig;
/// use edgeshim::context::ServerContext;
/// use edgeshim::resolver::VirtualAssetResolver;
/// use std::sync::Arc;
///
/// let store = InMemoryAssetStore::new()
///     .with_asset(
///         "/.next/server/pages-manifest.json",
///         AssetRecord::new(r#"{"/": "pages/index.js"}"#, "application/json"),
///     )
///     .with_module("/.next/server/pages/index.js", ModuleRecord::new("index", ()));
///
/// let context = ServerContext::builder(Arc::new(store)).build().unwrap();
/// let resolver = VirtualAssetResolver::new(Arc::new(context), ResolverConfig::default());
///
/// let path = resolver.resolve_page_path("/", None, false).unwrap();
/// assert_eq!(path, "/.next/server/pages/index.js");
/// assert!(resolver.read_module(&path).is_ok());
/// ```
pub struct VirtualAssetResolver {
    context: Arc<ServerContext>,
    path_cache: ModulePathCache,
    pages_manifest: Mutex<Option<Arc<PagesManifest>>>,
    app_paths_manifest: Mutex<Option<Arc<PagesManifest>>>,
}

impl VirtualAssetResolver {
    pub fn new(context: Arc<ServerContext>, config: ResolverConfig) -> Self {
        Self {
            context,
            path_cache: ModulePathCache::new(config.page_path_cache_capacity()),
            pages_manifest: Mutex::new(None),
            app_paths_manifest: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// `<dist>/server`.
    pub fn server_dir(&self) -> String {
        path::join(self.context.dist_dir(), SERVER_DIRECTORY)
    }

    /// Built file for `page`, or [`ResolveError::PageNotFound`].
    ///
    /// The app-paths manifest is consulted first when `has_app_variant`,
    /// then the pages manifest. With `locales`, manifest keys carrying a
    /// locale prefix also match the bare page.
    pub fn resolve_page_path(
        &self,
        page: &str,
        locales: Option<&[String]>,
        has_app_variant: bool,
    ) -> Result<String, ResolveError> {
        self.maybe_page_path(page, locales, has_app_variant)?
            .ok_or_else(|| ResolveError::PageNotFound {
                page: page.to_string(),
            })
    }

    /// Like [`resolve_page_path`](Self::resolve_page_path) but a miss is
    /// `Ok(None)`. Only manifest failures are errors.
    pub fn maybe_page_path(
        &self,
        page: &str,
        locales: Option<&[String]>,
        has_app_variant: bool,
    ) -> Result<Option<String>, ResolveError> {
        let key = PagePathKey::new(page, locales, has_app_variant);
        if let Some(memoized) = self.path_cache.get(&key) {
            trace!(page, resolved = ?memoized, "Page path memo hit");
            return Ok(memoized);
        }

        let resolved = self.lookup_page_path(page, locales, has_app_variant)?;
        debug!(page, resolved = ?resolved, app = has_app_variant, "Resolved page path");
        self.path_cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    fn lookup_page_path(
        &self,
        page: &str,
        locales: Option<&[String]>,
        has_app_variant: bool,
    ) -> Result<Option<String>, ResolveError> {
        let page = match normalize_page_path(page) {
            Ok(normalized) => denormalize_page_path(&normalized),
            Err(err) => {
                debug!(
                    requested = %err.requested,
                    resolved = %err.resolved,
                    "Requested and resolved page mismatch"
                );
                return Ok(None);
            }
        };

        let mut found = None;
        if has_app_variant {
            let manifest = self.app_paths_manifest()?;
            found = check_manifest(&manifest, &page, locales);
        }
        if found.is_none() {
            let manifest = self.pages_manifest()?;
            found = check_manifest(&manifest, &page, locales);
        }

        Ok(found.map(|entry| path::join(&self.server_dir(), &entry)))
    }

    /// Resolve `page` and load it: `.html` pages as text, everything else
    /// as a module.
    pub fn require_page(&self, page: &str, has_app_variant: bool) -> Result<LoadedPage, ResolveError> {
        let page_path = self.resolve_page_path(page, None, has_app_variant)?;

        if page_path.ends_with(".html") {
            return match self.read_text(&page_path)? {
                Some(html) => Ok(LoadedPage::Static(html)),
                None => Err(ResolveError::MissingStaticPage {
                    page: page.to_string(),
                    reason: format!("{} is not in the asset store", page_path),
                }),
            };
        }

        self.read_module(&page_path).map(LoadedPage::Module)
    }

    /// Content asset at `logical_path`. `None` means missing; an empty file
    /// is `Some` with no bytes.
    pub fn read_asset(&self, logical_path: &str) -> Option<AssetRecord> {
        self.context
            .store()
            .get_asset(&self.context.asset_key(logical_path))
    }

    /// Content asset as UTF-8 text.
    pub fn read_text(&self, logical_path: &str) -> Result<Option<String>, ResolveError> {
        match self.read_asset(logical_path) {
            Some(record) => record
                .text()
                .map(|t| Some(t.to_string()))
                .map_err(|_| ResolveError::InvalidUtf8 {
                    path: logical_path.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn content_type(&self, logical_path: &str) -> Option<String> {
        self.read_asset(logical_path)
            .map(|record| record.content_type().to_string())
    }

    pub fn asset_exists(&self, logical_path: &str) -> bool {
        self.read_asset(logical_path).is_some()
    }

    /// Whether any asset lives below `logical_dir`.
    pub fn directory_exists(&self, logical_dir: &str) -> bool {
        let prefix = self.directory_prefix(logical_dir);
        self.context
            .store()
            .asset_keys()
            .iter()
            .any(|key| key.starts_with(&prefix))
    }

    /// Every asset below `logical_dir`, recursively, as sorted logical paths.
    pub fn list_directory(&self, logical_dir: &str) -> Vec<String> {
        let prefix = self.directory_prefix(logical_dir);
        let mut paths: Vec<String> = self
            .context
            .store()
            .asset_keys()
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .map(|key| path::join(self.context.project_dir(), &key))
            .collect();
        paths.sort();
        paths
    }

    fn directory_prefix(&self, logical_dir: &str) -> String {
        let key = self.context.asset_key(logical_dir);
        if key.ends_with('/') {
            key
        } else {
            format!("{}/", key)
        }
    }

    /// Module at `logical_path`, `logical_path.js` or
    /// `logical_path/index.js`, first match wins.
    pub fn read_module(&self, logical_path: &str) -> Result<ModuleRecord, ResolveError> {
        let candidates = [
            logical_path.to_string(),
            format!("{}.js", logical_path),
            path::join(logical_path, "index.js"),
        ];

        for candidate in candidates {
            if let Some(module) = self
                .context
                .store()
                .get_module(&self.context.asset_key(&candidate))
            {
                trace!(requested = logical_path, resolved = %candidate, "Module resolved");
                return Ok(module.with_path(candidate));
            }
        }

        Err(ResolveError::ModuleNotFound {
            path: logical_path.to_string(),
        })
    }

    /// Parse a JSON manifest. Missing or malformed is fatal.
    pub fn read_manifest<T: DeserializeOwned>(&self, logical_path: &str) -> Result<T, ResolveError> {
        let record = self
            .read_asset(logical_path)
            .ok_or_else(|| ResolveError::manifest(logical_path, "not found in asset store"))?;
        serde_json::from_slice(record.bytes())
            .map_err(|e| ResolveError::manifest(logical_path, e.to_string()))
    }

    /// Trimmed contents of `<dist>/BUILD_ID`.
    pub fn build_id(&self) -> Result<String, ResolveError> {
        let build_id_path = path::join(self.context.dist_dir(), BUILD_ID_FILE);
        let text = self
            .read_text(&build_id_path)?
            .ok_or_else(|| ResolveError::manifest(&build_id_path, "not found in asset store"))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::manifest(&build_id_path, "build id is empty"));
        }
        Ok(trimmed.to_string())
    }

    /// `<dist>/build-manifest.json`.
    pub fn build_manifest(&self) -> Result<BuildManifest, ResolveError> {
        self.read_manifest(&path::join(self.context.dist_dir(), BUILD_MANIFEST))
    }

    pub fn path_cache_stats(&self) -> PathCacheStats {
        self.path_cache.stats()
    }

    fn pages_manifest(&self) -> Result<Arc<PagesManifest>, ResolveError> {
        self.cached_manifest(&self.pages_manifest, PAGES_MANIFEST)
    }

    fn app_paths_manifest(&self) -> Result<Arc<PagesManifest>, ResolveError> {
        self.cached_manifest(&self.app_paths_manifest, APP_PATHS_MANIFEST)
    }

    fn cached_manifest(
        &self,
        slot: &Mutex<Option<Arc<PagesManifest>>>,
        name: &str,
    ) -> Result<Arc<PagesManifest>, ResolveError> {
        if let Some(manifest) = slot.lock().as_ref() {
            return Ok(Arc::clone(manifest));
        }

        let manifest_path = path::join(&self.server_dir(), name);
        let manifest: Arc<PagesManifest> = Arc::new(self.read_manifest(&manifest_path)?);
        debug!(manifest = %manifest_path, entries = manifest.len(), "Loaded manifest");
        *slot.lock() = Some(Arc::clone(&manifest));
        Ok(manifest)
    }
}

/// Direct lookup, then (with locales) a lookup ignoring locale prefixes.
///
/// When several locale-prefixed keys match, the one whose locale comes
/// first in `locales` wins.
fn check_manifest(manifest: &PagesManifest, page: &str, locales: Option<&[String]>) -> Option<String> {
    if let Some(entry) = manifest.get(page) {
        return Some(entry.clone());
    }

    let locales = locales?;
    manifest
        .iter()
        .filter_map(|(key, entry)| {
            let stripped = normalize_locale_path(key, locales);
            if stripped.pathname != page {
                return None;
            }
            let rank = stripped
                .detected_locale
                .and_then(|found| locales.iter().position(|l| *l == found))
                .unwrap_or(usize::MAX);
            Some((rank, key, entry))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, _, entry)| entry.clone())
}
