//! [`RenderServer`]: page lookup, cached rendering, API routes and static files.

use std::sync::Arc;

use tracing::{debug, info};

use super::components::PageComponents;
use super::error::ServerError;
use super::types::{ApiExport, ApiRequest, PageExport, RenderRequest, RenderResponse};
use crate::assets::{content_type_for, path};
use crate::config::{ResolverConfig, ResponseCacheConfig};
use crate::context::ServerContext;
use crate::log::{Logger, TracingLogger};
use crate::log_error;
use crate::resolver::page_path::normalize_page_path;
use crate::resolver::{LoadedPage, ResolveError, VirtualAssetResolver};
use crate::response_cache::{ResponseCache, ResponseEntry, ResponseValue, Revalidate};

/// `Cache-Control` for responses that must not be stored.
pub const NO_STORE_CACHE_CONTROL: &str = "private, no-cache, no-store, max-age=0, must-revalidate";

/// Response header reporting whether the response cache generated the body.
pub const CACHE_STATUS_HEADER: &str = "x-edgeshim-cache";

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Serves one build's pages.
pub struct RenderServer {
    resolver: VirtualAssetResolver,
    cache: ResponseCache,
    build_id: String,
    logger: Arc<dyn Logger>,
}

impl RenderServer {
    /// Server with default resolver settings that logs through `tracing`.
    ///
    /// # Errors
    ///
    /// Fails if the build has no usable `BUILD_ID`.
    pub fn new(context: Arc<ServerContext>, cache_config: ResponseCacheConfig) -> Result<Self, ServerError> {
        Self::with_options(
            context,
            cache_config,
            ResolverConfig::default(),
            Arc::new(TracingLogger),
        )
    }

    pub fn with_options(
        context: Arc<ServerContext>,
        cache_config: ResponseCacheConfig,
        resolver_config: ResolverConfig,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, ServerError> {
        let resolver = VirtualAssetResolver::new(context, resolver_config);
        let build_id = resolver.build_id()?;
        info!(build_id = %build_id, dist_dir = %resolver.context().dist_dir(), "Render server ready");

        Ok(Self {
            resolver,
            cache: ResponseCache::with_logger(cache_config, Arc::clone(&logger)),
            build_id,
            logger,
        })
    }

    /// Build id read at construction.
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn resolver(&self) -> &VirtualAssetResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Whether the build has a page for `pathname`, considering the
    /// configured locales and app directory.
    pub fn has_page(&self, pathname: &str) -> Result<bool, ServerError> {
        let context = self.resolver.context();
        let found = self
            .resolver
            .maybe_page_path(pathname, context.locales(), context.has_app_dir())?;
        Ok(found.is_some())
    }

    /// Load the first page among the candidates for `pathname`.
    ///
    /// Candidates are the AMP variant (when `amp`) then the plain path, each
    /// tried with the `/<locale>` prefix first when a locale is given.
    pub fn find_page_components(
        &self,
        pathname: &str,
        locale: Option<&str>,
        amp: bool,
        is_app_path: bool,
    ) -> Result<Option<PageComponents>, ServerError> {
        for candidate in candidate_paths(pathname, locale, amp) {
            let components = match self.load_components(&candidate, is_app_path) {
                Ok(components) => components,
                Err(ResolveError::PageNotFound { .. }) => continue,
                Err(err) => return Err(err.into()),
            };

            if let Some(locale) = locale {
                let localized = candidate == format!("/{}", locale)
                    || candidate.starts_with(&format!("/{}/", locale));
                if components.static_html().is_some() && !localized {
                    debug!(candidate = %candidate, locale, "Skipping unlocalized static page");
                    continue;
                }
            }

            return Ok(Some(components));
        }
        Ok(None)
    }

    fn load_components(&self, page: &str, is_app_path: bool) -> Result<PageComponents, ResolveError> {
        let (document, app) = if is_app_path {
            (None, None)
        } else {
            (
                self.optional_module("/_document")?,
                self.optional_module("/_app")?,
            )
        };
        let component = self.resolver.require_page(page, is_app_path)?;

        Ok(PageComponents {
            page: page.to_string(),
            component,
            document,
            app,
            is_app_path,
        })
    }

    fn optional_module(&self, page: &str) -> Result<Option<crate::assets::ModuleRecord>, ResolveError> {
        match self.resolver.require_page(page, false) {
            Ok(LoadedPage::Module(module)) => Ok(Some(module)),
            Ok(LoadedPage::Static(_)) => Ok(None),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Render a page through the response cache.
    ///
    /// Missing pages become 404 responses and render failures 500 responses;
    /// only a broken build is an error.
    pub async fn render(&self, request: RenderRequest) -> Result<RenderResponse, ServerError> {
        let found = self.find_page_components(
            request.page(),
            request.locale.as_deref(),
            request.amp,
            request.is_app_path,
        );
        let components = match found {
            Ok(Some(components)) => components,
            Ok(None) => return Ok(self.not_found()),
            Err(ServerError::Resolve(err)) if err.is_not_found() => return Ok(self.not_found()),
            Err(err) => return Err(err),
        };

        if let Some(html) = components.static_html() {
            return Ok(RenderResponse::new(200, HTML, html.to_string())
                .with_header("cache-control", Revalidate::Never.cache_control()));
        }

        let renderer = page_renderer(&components)?;
        let key = (!request.uncached).then(|| cache_key(&request));
        let pathname = request.pathname.clone();
        let is_data_request = request.is_data_request;
        let context = request.cache;

        let result = self
            .cache
            .get(
                key.as_deref(),
                move |_handle| renderer.render(request, components),
                context,
            )
            .await;

        match result {
            Ok(Some(entry)) => Ok(entry_response(entry, is_data_request)),
            Ok(None) => Ok(self.not_found()),
            Err(err) => {
                log_error!(self.logger, "failed to render {}: {}", pathname, err);
                Ok(internal_error())
            }
        }
    }

    /// Run the API route `page`.
    ///
    /// Returns `Ok(None)` when the build has no such route so the caller can
    /// continue routing. Handler failures become 500 responses.
    pub async fn run_api(&self, page: &str, request: ApiRequest) -> Result<Option<RenderResponse>, ServerError> {
        let page_path = match self.resolver.resolve_page_path(page, None, false) {
            Ok(page_path) => page_path,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let module = match self.resolver.read_module(&page_path) {
            Ok(module) => module,
            Err(ResolveError::ModuleNotFound { .. }) => {
                debug!(page, path = %page_path, "API module missing");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let handler = module
            .exports::<ApiExport>()
            .cloned()
            .ok_or_else(|| ServerError::invalid_module(module.path(), "API handler"))?;

        match handler.handle(request).await {
            Ok(response) => Ok(Some(response)),
            Err(err) => {
                log_error!(self.logger, "API route {} failed: {}", page, err);
                Ok(Some(internal_error()))
            }
        }
    }

    /// Serve a file from the asset store by URL path (relative to the
    /// project directory).
    pub fn serve_static(&self, url_path: &str) -> RenderResponse {
        let decoded = match urlencoding::decode(url_path) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => return RenderResponse::new(400, TEXT, "400: Bad Request"),
        };
        let logical_path = path::join(self.resolver.context().project_dir(), &decoded);

        match self.resolver.read_asset(&logical_path) {
            Some(record) => {
                RenderResponse::new(200, record.content_type(), record.bytes().clone())
                    .with_header("content-length", record.len().to_string())
            }
            None => RenderResponse::new(404, TEXT, "404: Not Found"),
        }
    }

    pub fn log_stats(&self) {
        self.cache.log_stats();
        let paths = self.resolver.path_cache_stats();
        info!(
            hits = paths.hits,
            misses = paths.misses,
            entries = paths.entries,
            capacity = paths.capacity,
            hit_ratio = format!("{:.1}%", paths.hit_ratio() * 100.0),
            "Page path cache statistics"
        );
    }

    /// The build's static `/404` page if it has one, plain text otherwise.
    fn not_found(&self) -> RenderResponse {
        let response = match self.resolver.require_page("/404", false) {
            Ok(LoadedPage::Static(html)) => RenderResponse::new(404, HTML, html),
            _ => RenderResponse::new(404, TEXT, "404: This page could not be found"),
        };
        response.with_header("cache-control", NO_STORE_CACHE_CONTROL)
    }
}

impl std::fmt::Debug for RenderServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderServer")
            .field("build_id", &self.build_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

fn page_renderer(components: &PageComponents) -> Result<PageExport, ServerError> {
    let module = components
        .module()
        .ok_or_else(|| ServerError::invalid_module(&components.page, "page renderer"))?;
    module
        .exports::<PageExport>()
        .cloned()
        .ok_or_else(|| ServerError::invalid_module(module.path(), "page renderer"))
}

fn candidate_paths(pathname: &str, locale: Option<&str>, amp: bool) -> Vec<String> {
    let mut paths = Vec::with_capacity(4);
    // A pathname that fails normalization is left to the plain candidate,
    // which reports it as not found.
    if amp {
        if let Ok(base) = normalize_page_path(pathname) {
            paths.push(format!("{}.amp", base));
        }
    }
    paths.push(pathname.to_string());

    match locale {
        Some(locale) => paths
            .iter()
            .map(|p| format!("/{}{}", locale, if p == "/" { "" } else { p.as_str() }))
            .chain(paths.iter().cloned())
            .collect(),
        None => paths,
    }
}

/// `<locale-prefix><pathname>[.amp][.data]`; the root page of a locale is
/// just `/<locale>`.
fn cache_key(request: &RenderRequest) -> String {
    let normalized = path::normalize(&format!("/{}", request.pathname.trim_start_matches('/')));
    let pathname = path::remove_trailing_slash(&normalized);

    let mut key = String::new();
    match &request.locale {
        Some(locale) => {
            key.push('/');
            key.push_str(locale);
            if pathname != "/" {
                key.push_str(pathname);
            }
        }
        None => key.push_str(pathname),
    }
    if request.amp {
        key.push_str(".amp");
    }
    if request.is_data_request {
        key.push_str(".data");
    }
    key
}

fn entry_response(entry: ResponseEntry, is_data_request: bool) -> RenderResponse {
    let cache_control = entry
        .revalidate
        .map(|revalidate| revalidate.cache_control())
        .unwrap_or_else(|| NO_STORE_CACHE_CONTROL.to_string());
    let cache_status = if entry.is_miss { "MISS" } else { "HIT" };

    let response = match entry.value {
        ResponseValue::Page {
            html,
            page_data,
            headers,
            status,
        } => {
            let status = status.unwrap_or(200);
            let mut response = if is_data_request {
                RenderResponse::new(status, JSON, page_data.to_string())
            } else {
                RenderResponse::new(status, HTML, html)
            };
            response.headers.extend(headers);
            response
        }
        ResponseValue::Redirect { location, permanent } => {
            let status = if permanent { 308 } else { 307 };
            if is_data_request {
                let body = serde_json::json!({
                    "pageProps": {
                        "__N_REDIRECT": location,
                        "__N_REDIRECT_STATUS": status,
                    }
                });
                RenderResponse::new(200, JSON, body.to_string())
            } else {
                RenderResponse::new(status, TEXT, location.clone()).with_header("location", location)
            }
        }
        ResponseValue::Route {
            body,
            headers,
            status,
        } => RenderResponse {
            status,
            headers,
            body,
        },
        ResponseValue::Image {
            body,
            etag,
            extension,
        } => RenderResponse::new(200, content_type_for(&format!("image.{}", extension)), body)
            .with_header("etag", etag),
    };

    response
        .with_header("cache-control", cache_control)
        .with_header(CACHE_STATUS_HEADER, cache_status)
}

fn internal_error() -> RenderResponse {
    RenderResponse::new(500, TEXT, "500: Internal Server Error")
        .with_header("cache-control", NO_STORE_CACHE_CONTROL)
}
