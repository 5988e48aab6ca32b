//! Request and response types plus the module export traits.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;

use super::components::PageComponents;
use crate::response_cache::{CacheContext, GenerationError, Headers, ResponseEntry};

/// A page request.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Route pathname without locale prefix, e.g. `/products/42`
    pub pathname: String,
    /// Page to load when it differs from the pathname, e.g. `/products/[id]`
    pub page: Option<String>,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub locale: Option<String>,
    pub amp: bool,
    /// Client-side navigation: respond with the page data as JSON
    pub is_data_request: bool,
    pub is_app_path: bool,
    /// Bypass the response cache (preview mode, draft requests)
    pub uncached: bool,
    pub cache: CacheContext,
}

impl RenderRequest {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    pub fn for_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Page to load: [`page`](Self::page) if set, else the pathname.
    pub fn page(&self) -> &str {
        self.page.as_deref().unwrap_or(&self.pathname)
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn amp(mut self) -> Self {
        self.amp = true;
        self
    }

    pub fn data(mut self) -> Self {
        self.is_data_request = true;
        self
    }

    pub fn app_path(mut self) -> Self {
        self.is_app_path = true;
        self
    }

    pub fn uncached(mut self) -> Self {
        self.uncached = true;
        self
    }

    pub fn with_cache_context(mut self, cache: CacheContext) -> Self {
        self.cache = cache;
        self
    }
}

/// An API route request.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub pathname: String,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// A finished HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl RenderResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Export of a renderable page module.
///
/// `Ok(None)` means the page decided it has nothing to show (404).
pub trait PageRenderer: Send + Sync {
    fn render(
        &self,
        request: RenderRequest,
        components: PageComponents,
    ) -> BoxFuture<'static, Result<Option<ResponseEntry>, GenerationError>>;
}

/// Export of an API route module.
pub trait ApiHandler: Send + Sync {
    fn handle(&self, request: ApiRequest) -> BoxFuture<'static, Result<RenderResponse, GenerationError>>;
}

/// Type stored in a page [`crate::assets::ModuleRecord`].
pub type PageExport = Arc<dyn PageRenderer>;

/// Type stored in an API [`crate::assets::ModuleRecord`].
pub type ApiExport = Arc<dyn ApiHandler>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RenderResponse::new(200, "text/html", "<p>hi</p>").with_header("ETag", "\"1\"");
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.header("etag"), Some("\"1\""));
        assert_eq!(response.text(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_request_builders() {
        let request = RenderRequest::new("/blog").with_locale("fr").amp().data();
        assert_eq!(request.locale.as_deref(), Some("fr"));
        assert!(request.amp && request.is_data_request && !request.uncached);
        assert_eq!(request.page(), "/blog");
        assert_eq!(RenderRequest::new("/p/1").for_page("/p/[id]").page(), "/p/[id]");
    }
}
