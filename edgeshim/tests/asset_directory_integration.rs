//! Integration tests for resolving against a build directory loaded from disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use edgeshim::assets::InMemoryAssetStore;
use edgeshim::config::ResolverConfig;
use edgeshim::context::ServerContext;
use edgeshim::resolver::{LoadedPage, ResolveError, VirtualAssetResolver};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn build_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, ".next/BUILD_ID", b"disk-build\n");
    write(
        root,
        ".next/server/pages-manifest.json",
        br#"{"/": "pages/index.html", "/docs": "pages/docs.html"}"#,
    );
    write(root, ".next/server/pages/index.html", b"<h1>home</h1>");
    write(root, ".next/static/chunks/main.js", b"console.log(1)");
    write(root, ".next/static/empty.css", b"");
    dir
}

fn resolver_for(dir: &TempDir) -> VirtualAssetResolver {
    let store = InMemoryAssetStore::from_directory(dir.path()).unwrap();
    let context = ServerContext::builder(Arc::new(store)).build().unwrap();
    VirtualAssetResolver::new(Arc::new(context), ResolverConfig::default())
}

#[test]
fn test_directory_build_resolves() {
    let dir = build_dir();
    let resolver = resolver_for(&dir);

    assert_eq!(resolver.build_id().unwrap(), "disk-build");
    match resolver.require_page("/", false).unwrap() {
        LoadedPage::Static(html) => assert_eq!(html, "<h1>home</h1>"),
        other => panic!("expected static page, got {:?}", other),
    }
}

#[test]
fn test_manifest_entry_without_file() {
    let dir = build_dir();
    let resolver = resolver_for(&dir);

    let err = resolver.require_page("/docs", false).unwrap_err();
    assert!(matches!(err, ResolveError::MissingStaticPage { .. }));
}

#[test]
fn test_static_assets_and_content_types() {
    let dir = build_dir();
    let resolver = resolver_for(&dir);

    let main = resolver.read_asset("/.next/static/chunks/main.js").unwrap();
    assert_eq!(main.content_type(), "application/javascript");
    assert_eq!(main.text().unwrap(), "console.log(1)");

    let empty = resolver.read_asset("/.next/static/empty.css").unwrap();
    assert!(empty.is_empty());

    assert_eq!(
        resolver.list_directory("/.next/static"),
        vec!["/.next/static/chunks/main.js", "/.next/static/empty.css"]
    );
}

#[test]
fn test_files_are_not_modules() {
    let dir = build_dir();
    let resolver = resolver_for(&dir);

    let err = resolver.read_module("/.next/static/chunks/main").unwrap_err();
    assert!(err.is_not_found());
}
