//! Cached response values.

use bytes::Bytes;

/// Response headers in insertion order.
pub type Headers = Vec<(String, String)>;

/// How long a generated response may be reused before regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revalidate {
    /// Regenerate after this many seconds
    Seconds(u32),
    /// Never regenerate (static until the next build)
    Never,
}

impl Revalidate {
    /// Shared-cache lifetime used when the response never revalidates.
    pub const NEVER_MAX_AGE: u32 = 31_536_000;

    /// `Cache-Control` value for a response with this interval.
    pub fn cache_control(&self) -> String {
        let max_age = match self {
            Self::Seconds(seconds) => *seconds,
            Self::Never => Self::NEVER_MAX_AGE,
        };
        format!("s-maxage={}, stale-while-revalidate", max_age)
    }
}

/// The kinds of response the cache stores.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// Rendered page with its data payload
    Page {
        html: String,
        page_data: serde_json::Value,
        headers: Headers,
        status: Option<u16>,
    },
    /// Redirect returned by the page's data function
    Redirect { location: String, permanent: bool },
    /// Body produced by a route handler
    Route {
        body: Bytes,
        headers: Headers,
        status: u16,
    },
    /// Optimized image
    Image {
        body: Bytes,
        etag: String,
        extension: String,
    },
}

impl ResponseValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Page { .. } => "page",
            Self::Redirect { .. } => "redirect",
            Self::Route { .. } => "route",
            Self::Image { .. } => "image",
        }
    }
}

/// A generated response plus its caching metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEntry {
    pub value: ResponseValue,
    /// `Some` when the response declares a revalidation interval
    pub revalidate: Option<Revalidate>,
    /// Set on entries handed to callers straight from a generation
    pub is_miss: bool,
}

impl ResponseEntry {
    pub fn new(value: ResponseValue) -> Self {
        Self {
            value,
            revalidate: None,
            is_miss: false,
        }
    }

    pub fn with_revalidate(mut self, revalidate: Revalidate) -> Self {
        self.revalidate = Some(revalidate);
        self
    }

    /// Whether this entry is eligible to become the previous item.
    pub fn declares_revalidate(&self) -> bool {
        self.revalidate.is_some()
    }

    pub(crate) fn into_miss(mut self) -> Self {
        self.is_miss = true;
        self
    }

    pub(crate) fn into_stored(mut self) -> Self {
        self.is_miss = false;
        self
    }
}

/// Per-request flags passed to [`super::ResponseCache::get`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheContext {
    /// On-demand revalidation: deduplicated separately from normal requests
    pub is_manual_revalidate: bool,
    /// Advisory; prefetch requests are coalesced like any other
    pub is_prefetch: bool,
}

impl CacheContext {
    pub fn manual_revalidate() -> Self {
        Self {
            is_manual_revalidate: true,
            ..Self::default()
        }
    }

    pub fn prefetch() -> Self {
        Self {
            is_prefetch: true,
            ..Self::default()
        }
    }
}
