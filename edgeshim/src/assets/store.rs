//! Asset store contract and the in-memory implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use super::error::AssetError;
use super::module::ModuleRecord;
use super::path;

/// Metadata attached to a content asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    pub content_type: String,
}

/// Content stored under a logical path.
///
/// Text is a UTF-8 view of the same bytes. Cloning shares the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    bytes: Bytes,
    metadata: AssetMetadata,
}

impl AssetRecord {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            metadata: AssetMetadata {
                content_type: content_type.into(),
            },
        }
    }

    /// Build a record whose content type is inferred from `path`'s extension.
    pub fn for_path(path: &str, bytes: impl Into<Bytes>) -> Self {
        Self::new(bytes, content_type_for(path))
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The content as UTF-8 text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }

    pub fn content_type(&self) -> &str {
        &self.metadata.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read-only lookup of build output by logical path.
///
/// Initialized once by the host before any request is served and shared for
/// the lifetime of the process. Implementations must be cheap to query:
/// the resolver calls these on every request that misses its memo.
pub trait AssetStore: Send + Sync {
    /// Content asset at exactly `key`, if any.
    fn get_asset(&self, key: &str) -> Option<AssetRecord>;

    /// Module registered at exactly `key`, if any.
    fn get_module(&self, key: &str) -> Option<ModuleRecord>;

    /// Every content asset key, in no particular order.
    fn asset_keys(&self) -> Vec<String>;
}

/// [`AssetStore`] backed by two hash maps.
///
/// # Example
///
/// ```
/// use edgeshim::assets::{AssetRecord, AssetStore, InMemoryAssetStore, ModuleRecord};
///
/// let store = InMemoryAssetStore::new()
///     .with_asset("/.next/BUILD_ID", AssetRecord::new("abc123\n", "text/plain"))
///     .with_module("/.next/server/pages/index.js", ModuleRecord::new("index", ()));
///
/// assert!(store.get_asset("/.next/BUILD_ID").is_some());
/// assert!(store.get_module("/.next/server/pages/index.js").is_some());
/// assert!(store.get_asset("/.next/server/pages/index.js").is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssetStore {
    assets: HashMap<String, AssetRecord>,
    modules: HashMap<String, ModuleRecord>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file under `root` as a content asset.
    ///
    /// Keys are the file paths relative to `root` with a leading slash, so a
    /// project directory loaded this way lines up with a
    /// [`crate::context::ServerContext`] whose project directory is `/`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory, a file cannot be read, or a file
    /// name is not valid UTF-8.
    pub fn from_directory(root: &Path) -> Result<Self, AssetError> {
        if !root.is_dir() {
            return Err(AssetError::NotADirectory(root.to_path_buf()));
        }

        let mut store = Self::new();
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|source| AssetError::Io {
                path: dir.clone(),
                source,
            })?;

            for entry in entries {
                let entry = entry.map_err(|source| AssetError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let file_path = entry.path();

                if file_path.is_dir() {
                    pending.push(file_path);
                    continue;
                }

                let key = logical_key(root, &file_path)?;
                let data = fs::read(&file_path).map_err(|source| AssetError::Io {
                    path: file_path.clone(),
                    source,
                })?;
                let record = AssetRecord::for_path(&key, data);
                store.assets.insert(key, record);
            }
        }

        debug!(
            root = %root.display(),
            assets = store.assets.len(),
            "Loaded asset directory"
        );

        Ok(store)
    }

    /// Builder-style [`insert_asset`](Self::insert_asset).
    pub fn with_asset(mut self, key: &str, record: AssetRecord) -> Self {
        self.insert_asset(key, record);
        self
    }

    /// Builder-style [`insert_module`](Self::insert_module).
    pub fn with_module(mut self, key: &str, record: ModuleRecord) -> Self {
        self.insert_module(key, record);
        self
    }

    /// Insert or replace a content asset. The key is normalized to an
    /// absolute logical path.
    pub fn insert_asset(&mut self, key: &str, record: AssetRecord) -> Option<AssetRecord> {
        self.assets.insert(absolute_key(key), record)
    }

    /// Insert or replace a module. The key is normalized to an absolute
    /// logical path.
    pub fn insert_module(&mut self, key: &str, record: ModuleRecord) -> Option<ModuleRecord> {
        self.modules.insert(absolute_key(key), record)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl AssetStore for InMemoryAssetStore {
    fn get_asset(&self, key: &str) -> Option<AssetRecord> {
        self.assets.get(key).cloned()
    }

    fn get_module(&self, key: &str) -> Option<ModuleRecord> {
        self.modules.get(key).cloned()
    }

    fn asset_keys(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }
}

fn absolute_key(key: &str) -> String {
    path::normalize(&format!("/{}", key.trim_start_matches('/')))
}

fn logical_key(root: &Path, file: &Path) -> Result<String, AssetError> {
    let relative = file
        .strip_prefix(root)
        .map_err(|_| AssetError::NonUtf8Path(file.to_path_buf()))?;

    let mut key = String::new();
    for component in relative.components() {
        let segment = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| AssetError::NonUtf8Path(file.to_path_buf()))?;
        key.push('/');
        key.push_str(segment);
    }
    Ok(key)
}

/// Content type for a logical path, by extension.
pub fn content_type_for(path: &str) -> &'static str {
    match path::extension(path).map(str::to_ascii_lowercase).as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") | Some("cjs") => "application/javascript",
        Some("json") | Some("map") => "application/json",
        Some("css") => "text/css",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_asset_is_present() {
        let store = InMemoryAssetStore::new().with_asset("/empty.txt", AssetRecord::new("", "text/plain"));

        let record = store.get_asset("/empty.txt").expect("present");
        assert!(record.is_empty());
        assert_eq!(record.text().unwrap(), "");
        assert!(store.get_asset("/missing.txt").is_none());
    }

    #[test]
    fn test_keys_are_normalized_on_insert() {
        let store = InMemoryAssetStore::new()
            .with_asset(".next//BUILD_ID", AssetRecord::new("x", "text/plain"))
            .with_module("server/./pages/a.js", ModuleRecord::new("a", ()));

        assert!(store.get_asset("/.next/BUILD_ID").is_some());
        assert!(store.get_module("/server/pages/a.js").is_some());
    }

    #[test]
    fn test_assets_and_modules_are_separate_tables() {
        let store = InMemoryAssetStore::new().with_module("/m.js", ModuleRecord::new("/m.js", 1u8));

        assert!(store.get_asset("/m.js").is_none());
        assert_eq!(store.asset_count(), 0);
        assert_eq!(store.module_count(), 1);
        assert!(store.asset_keys().is_empty());
    }

    #[test]
    fn test_from_directory_loads_nested_files() {
        let temp = TempDir::new().unwrap();
        let server = temp.path().join(".next").join("server").join("pages");
        fs::create_dir_all(&server).unwrap();
        fs::write(temp.path().join(".next").join("BUILD_ID"), "build-7\n").unwrap();
        fs::write(server.join("about.html"), "<h1>About</h1>").unwrap();

        let store = InMemoryAssetStore::from_directory(temp.path()).unwrap();

        assert_eq!(store.asset_count(), 2);
        let page = store.get_asset("/.next/server/pages/about.html").unwrap();
        assert_eq!(page.text().unwrap(), "<h1>About</h1>");
        assert_eq!(page.content_type(), "text/html; charset=utf-8");

        let mut keys = store.asset_keys();
        keys.sort();
        assert_eq!(keys, vec!["/.next/BUILD_ID", "/.next/server/pages/about.html"]);
    }

    #[test]
    fn test_from_directory_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        let err = InMemoryAssetStore::from_directory(&file).unwrap_err();
        assert!(matches!(err, AssetError::NotADirectory(_)));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let record = AssetRecord::new(vec![0xff, 0xfe], "application/octet-stream");
        assert!(record.text().is_err());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("/a/b.JSON"), "application/json");
        assert_eq!(content_type_for("/_next/static/chunk.js"), "application/javascript");
        assert_eq!(content_type_for("/BUILD_ID"), "application/octet-stream");
        assert_eq!(content_type_for("/font.woff2"), "font/woff2");
    }
}
