//! Page name normalization and locale prefix handling.
//!
//! Page names as they appear in manifests: `/` is stored as `/index`, and a
//! real page under an `index` directory (`/index/about`) is stored with an
//! extra `/index` prefix so the two never collide.

use crate::assets::path;

/// Error from [`normalize_page_path`]: the page contains segments that
/// normalize to something else (`..`, `//`, `./`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeError {
    pub requested: String,
    pub resolved: String,
}

/// Whether any segment is a dynamic parameter such as `[id]` or `[...slug]`.
pub fn is_dynamic_route(page: &str) -> bool {
    page.split('/')
        .any(|segment| segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']'))
}

/// Page name → manifest key form.
///
/// ```
/// use edgeshim::resolver::page_path::normalize_page_path;
///
/// assert_eq!(normalize_page_path("/").unwrap(), "/index");
/// assert_eq!(normalize_page_path("about").unwrap(), "/about");
/// assert_eq!(normalize_page_path("/index/about").unwrap(), "/index/index/about");
/// assert!(normalize_page_path("/a/../b").is_err());
/// ```
pub fn normalize_page_path(page: &str) -> Result<String, NormalizeError> {
    let starts_with_index = page == "/index" || page.starts_with("/index/");
    let normalized = if starts_with_index && !is_dynamic_route(page) {
        format!("/index{}", page)
    } else if page == "/" {
        "/index".to_string()
    } else if page.starts_with('/') {
        page.to_string()
    } else {
        format!("/{}", page)
    };

    let resolved = path::normalize(&normalized);
    if resolved != normalized {
        return Err(NormalizeError {
            requested: normalized,
            resolved,
        });
    }
    Ok(normalized)
}

/// Manifest key form → page name (inverse of [`normalize_page_path`]).
pub fn denormalize_page_path(page: &str) -> String {
    let page = page.replace('\\', "/");
    if page.starts_with("/index/") && !is_dynamic_route(&page) {
        page["/index".len()..].to_string()
    } else if page == "/index" {
        "/".to_string()
    } else {
        page
    }
}

/// Result of stripping a locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePathResult {
    /// Pathname with the locale segment removed (`/` if nothing remains)
    pub pathname: String,
    /// The configured locale that matched, in its configured spelling
    pub detected_locale: Option<String>,
}

/// Strip a leading locale segment, matched case-insensitively.
///
/// ```
/// use edgeshim::resolver::page_path::normalize_locale_path;
///
/// let locales = vec!["en-US".to_string(), "fr".to_string()];
/// let result = normalize_locale_path("/en-us/blog", &locales);
/// assert_eq!(result.pathname, "/blog");
/// assert_eq!(result.detected_locale.as_deref(), Some("en-US"));
/// ```
pub fn normalize_locale_path(pathname: &str, locales: &[String]) -> LocalePathResult {
    let mut parts: Vec<&str> = pathname.split('/').collect();

    let detected = parts.get(1).copied().filter(|s| !s.is_empty()).and_then(|first| {
        locales
            .iter()
            .find(|locale| locale.eq_ignore_ascii_case(first))
            .cloned()
    });

    match detected {
        Some(locale) => {
            parts.remove(1);
            let joined = parts.join("/");
            LocalePathResult {
                pathname: if joined.is_empty() {
                    "/".to_string()
                } else {
                    joined
                },
                detected_locale: Some(locale),
            }
        }
        None => LocalePathResult {
            pathname: pathname.to_string(),
            detected_locale: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<String> {
        vec!["en".to_string(), "fr-CA".to_string()]
    }

    #[test]
    fn test_dynamic_route_detection() {
        assert!(is_dynamic_route("/products/[id]"));
        assert!(is_dynamic_route("/docs/[...slug]"));
        assert!(!is_dynamic_route("/products/42"));
        assert!(!is_dynamic_route("/[]"));
    }

    #[test]
    fn test_normalize_index_variants() {
        assert_eq!(normalize_page_path("/index").unwrap(), "/index/index");
        assert_eq!(normalize_page_path("/index/[id]").unwrap(), "/index/[id]");
        assert_eq!(normalize_page_path("/blog/index").unwrap(), "/blog/index");
    }

    #[test]
    fn test_normalize_rejects_traversal_and_double_slash() {
        let err = normalize_page_path("/a/../../etc").unwrap_err();
        assert_eq!(err.resolved, "/etc");
        assert!(normalize_page_path("//a").is_err());
        assert!(normalize_page_path("/a/./b").is_err());
    }

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize_page_path("/index"), "/");
        assert_eq!(denormalize_page_path("/index/index"), "/index");
        assert_eq!(denormalize_page_path("/index/about"), "/about");
        assert_eq!(denormalize_page_path("/index/[id]"), "/index/[id]");
        assert_eq!(denormalize_page_path("\\blog\\post"), "/blog/post");
    }

    #[test]
    fn test_normalize_then_denormalize_is_identity_for_plain_pages() {
        for page in ["/", "/about", "/index", "/index/about", "/blog/[slug]"] {
            let normalized = normalize_page_path(page).unwrap();
            assert_eq!(denormalize_page_path(&normalized), page, "page {}", page);
        }
    }

    #[test]
    fn test_locale_root() {
        let result = normalize_locale_path("/fr-ca", &locales());
        assert_eq!(result.pathname, "/");
        assert_eq!(result.detected_locale.as_deref(), Some("fr-CA"));
    }

    #[test]
    fn test_locale_not_matched() {
        let result = normalize_locale_path("/de/about", &locales());
        assert_eq!(result.pathname, "/de/about");
        assert!(result.detected_locale.is_none());
    }

    #[test]
    fn test_locale_only_first_segment() {
        let result = normalize_locale_path("/about/en", &locales());
        assert_eq!(result.pathname, "/about/en");
        assert!(result.detected_locale.is_none());
    }

    #[test]
    fn test_locale_with_trailing_segments() {
        let result = normalize_locale_path("/en/blog/post", &locales());
        assert_eq!(result.pathname, "/blog/post");
        assert_eq!(result.detected_locale.as_deref(), Some("en"));
    }
}
