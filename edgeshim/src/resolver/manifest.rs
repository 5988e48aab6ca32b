//! Build output layout and manifest types.

use std::collections::HashMap;

use serde::Deserialize;

/// Directory under the dist directory holding server bundles.
pub const SERVER_DIRECTORY: &str = "server";

/// Page name → built file, relative to the server directory.
pub const PAGES_MANIFEST: &str = "pages-manifest.json";

/// App route name → built file, relative to the server directory.
pub const APP_PATHS_MANIFEST: &str = "app-paths-manifest.json";

/// Client build manifest, relative to the dist directory.
pub const BUILD_MANIFEST: &str = "build-manifest.json";

/// Build identifier file, relative to the dist directory.
pub const BUILD_ID_FILE: &str = "BUILD_ID";

/// Page name → path of the built page relative to the server directory.
pub type PagesManifest = HashMap<String, String>;

/// Client build manifest: the scripts each page needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    #[serde(default)]
    pub polyfill_files: Vec<String>,
    #[serde(default)]
    pub low_priority_files: Vec<String>,
    #[serde(default)]
    pub pages: HashMap<String, Vec<String>>,
}

impl BuildManifest {
    /// Scripts for `page`, followed by those of `/_app`, without duplicates.
    pub fn page_files(&self, page: &str) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for name in [page, "/_app"] {
            for file in self.pages.get(name).into_iter().flatten() {
                if !files.contains(&file.as_str()) {
                    files.push(file);
                }
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_manifest_parse_and_page_files() {
        let manifest: BuildManifest = serde_json::from_str(
            r#"{
                "polyfillFiles": ["static/chunks/polyfills.js"],
                "pages": {
                    "/": ["static/chunks/webpack.js", "static/chunks/pages/index.js"],
                    "/_app": ["static/chunks/webpack.js", "static/chunks/pages/_app.js"]
                },
                "ampFirstPages": []
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.polyfill_files, vec!["static/chunks/polyfills.js"]);
        assert!(manifest.low_priority_files.is_empty());
        assert_eq!(
            manifest.page_files("/"),
            vec![
                "static/chunks/webpack.js",
                "static/chunks/pages/index.js",
                "static/chunks/pages/_app.js"
            ]
        );
        assert_eq!(manifest.page_files("/missing"), manifest.page_files("/_app"));
    }
}
