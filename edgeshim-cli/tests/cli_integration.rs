//! End-to-end tests for the edgeshim binary against a build on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Build directory plus a config file that keeps logs inside the temp dir.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "site/.next/BUILD_ID", "cli-build\n");
    write(
        root,
        "site/.next/server/pages-manifest.json",
        r#"{"/": "pages/index.html", "/en/pricing": "pages/en/pricing.html", "/blog": "pages/blog.js", "/de/shop": "pages/de/shop.js", "/gone": "pages/gone.js"}"#,
    );
    write(root, "site/.next/server/pages/blog.js", "export default function Blog() {}");
    write(root, "site/.next/server/pages/de/shop.js", "export default function Shop() {}");
    write(root, "site/.next/server/pages/index.html", "<h1>home</h1>");
    write(root, "site/.next/server/pages/en/pricing.html", "<h1>pricing</h1>");
    write(
        root,
        "config.ini",
        &format!(
            "[server]\nassets_dir = {}\nlocales = en, de\n\n[logging]\ndirectory = {}\n",
            root.join("site").display(),
            root.join("logs").display()
        ),
    );
    dir
}

fn edgeshim(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_edgeshim"))
        .arg("--config")
        .arg(dir.path().join("config.ini"))
        .args(args)
        .output()
        .expect("failed to run edgeshim binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_build_id() {
    let dir = fixture();
    let output = edgeshim(&dir, &["build-id"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "cli-build\n");
    assert!(dir.path().join("logs").join("edgeshim.log").exists());
}

#[test]
fn test_resolve_page() {
    let dir = fixture();
    let output = edgeshim(&dir, &["resolve", "/", "--kind"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "/.next/server/pages/index.html\tstatic\n");
}

#[test]
fn test_resolve_with_locales() {
    let dir = fixture();

    let without = edgeshim(&dir, &["resolve", "/pricing"]);
    assert_eq!(without.status.code(), Some(2));

    let with = edgeshim(&dir, &["resolve", "/pricing", "--locales"]);
    assert!(with.status.success());
    assert_eq!(stdout(&with), "/.next/server/pages/en/pricing.html\n");
}

#[test]
fn test_resolve_kind_of_module_pages() {
    let dir = fixture();

    let blog = edgeshim(&dir, &["resolve", "/blog", "--kind"]);
    assert!(blog.status.success());
    assert_eq!(stdout(&blog), "/.next/server/pages/blog.js\tmodule\n");

    let gone = edgeshim(&dir, &["resolve", "/gone", "--kind"]);
    assert!(gone.status.success());
    assert_eq!(stdout(&gone), "/.next/server/pages/gone.js\tmissing\n");
}

#[test]
fn test_resolve_kind_with_locales() {
    let dir = fixture();

    let shop = edgeshim(&dir, &["resolve", "/shop", "--locales", "--kind"]);
    assert!(shop.status.success(), "stderr: {}", String::from_utf8_lossy(&shop.stderr));
    assert_eq!(stdout(&shop), "/.next/server/pages/de/shop.js\tmodule\n");

    let pricing = edgeshim(&dir, &["resolve", "/pricing", "--locales", "--kind"]);
    assert_eq!(stdout(&pricing), "/.next/server/pages/en/pricing.html\tstatic\n");
}

#[test]
fn test_cat_asset() {
    let dir = fixture();

    let output = edgeshim(&dir, &["cat", ".next/server/pages/index.html"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "<h1>home</h1>");

    let content_type = edgeshim(&dir, &["cat", "/.next/BUILD_ID", "--content-type"]);
    assert_eq!(stdout(&content_type), "application/octet-stream\n");
}

#[test]
fn test_cat_missing_asset() {
    let dir = fixture();
    let output = edgeshim(&dir, &["cat", "/nope.txt"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("asset not found: /nope.txt"));
}

#[test]
fn test_assets_dir_flag_overrides_config() {
    let dir = fixture();
    let other = TempDir::new().unwrap();
    write(other.path(), ".next/BUILD_ID", "other-build");

    let output = edgeshim(
        &dir,
        &["--assets-dir", other.path().to_str().unwrap(), "build-id"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "other-build\n");
}
