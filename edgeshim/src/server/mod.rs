//! Request handling on top of the resolver and the response cache.
//!
//! [`RenderServer`] owns one [`crate::resolver::VirtualAssetResolver`] and one
//! [`crate::response_cache::ResponseCache`]. Page modules in the asset store
//! export an `Arc<dyn PageRenderer>`, API modules an `Arc<dyn ApiHandler>`.

mod components;
mod error;
mod facade;
mod types;

pub use components::PageComponents;
pub use error::ServerError;
pub use facade::{RenderServer, CACHE_STATUS_HEADER, NO_STORE_CACHE_CONTROL};
pub use types::{
    ApiExport, ApiHandler, ApiRequest, PageExport, PageRenderer, RenderRequest, RenderResponse,
};
