//! edgeshim - server rendering support for hosts without a filesystem
//!
//! This library provides the two pieces a framework server needs when its
//! build output lives in memory (edge workers, sandboxes):
//!
//! - [`response_cache`]: a single-flight cache that collapses concurrent
//!   regenerations of the same response and briefly reuses the last one
//! - [`resolver`]: framework file reads (manifests, page modules, static
//!   HTML, build id) served from an [`assets::AssetStore`]
//!
//! # High-Level API
//!
//! For most use cases, the [`server`] module wires both together:
//!
//! ```ignore
//! use edgeshim::config::ResponseCacheConfig;
//! use edgeshim::context::ServerContext;
//! use edgeshim::server::{RenderRequest, RenderServer};
//!
//! let context = ServerContext::builder(store).project_dir("/app").build()?;
//! let server = RenderServer::new(Arc::new(context), ResponseCacheConfig::default())?;
//!
//! let response = server.render(RenderRequest::new("/products/42")).await?;
//! ```

pub mod assets;
pub mod config;
pub mod context;
pub mod log;
pub mod logging;
pub mod resolver;
pub mod response_cache;
pub mod server;

/// Version of the edgeshim library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
