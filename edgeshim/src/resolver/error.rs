//! Resolver errors.

use thiserror::Error;

/// Errors from [`super::VirtualAssetResolver`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No manifest entry for the page (recoverable: 404)
    #[error("page not found: {page}")]
    PageNotFound { page: String },

    /// No module at the path or its `.js` / `/index.js` variants (recoverable: 404)
    #[error("module not found: {path}")]
    ModuleNotFound { path: String },

    /// The manifest points at an HTML file that is not in the store
    #[error("failed to load static file for page {page}: {reason}")]
    MissingStaticPage { page: String, reason: String },

    /// A manifest or build metadata file is missing or malformed
    #[error("manifest {path} is unusable: {reason}")]
    Manifest { path: String, reason: String },

    /// A text asset is not valid UTF-8
    #[error("asset {path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
}

impl ResolveError {
    /// Whether this is a routing miss rather than a broken build.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound { .. } | Self::ModuleNotFound { .. })
    }

    pub(crate) fn manifest(path: &str, reason: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(ResolveError::PageNotFound { page: "/a".into() }.is_not_found());
        assert!(ResolveError::ModuleNotFound { path: "/a".into() }.is_not_found());
        assert!(!ResolveError::manifest("/m.json", "bad").is_not_found());
        assert!(!ResolveError::InvalidUtf8 { path: "/a".into() }.is_not_found());
        assert!(!ResolveError::MissingStaticPage {
            page: "/a".into(),
            reason: "gone".into()
        }
        .is_not_found());
    }

    #[test]
    fn test_display() {
        let err = ResolveError::manifest("/.next/server/pages-manifest.json", "expected value");
        assert_eq!(
            err.to_string(),
            "manifest /.next/server/pages-manifest.json is unusable: expected value"
        );
    }
}
