//! Virtual asset resolution.
//!
//! Translates the paths the framework server would have read from disk into
//! lookups against the [`crate::assets::AssetStore`]:
//!
//! - page names → built page paths, via the pages and app-paths manifests,
//!   memoized in a bounded LRU
//! - logical paths → content ([`VirtualAssetResolver::read_asset`]) or
//!   modules ([`VirtualAssetResolver::read_module`], with `.js` and
//!   `/index.js` probing)
//!
//! `PageNotFound` and `ModuleNotFound` are routing signals the caller turns
//! into a 404; every other [`ResolveError`] means the build is unusable.

mod error;
pub mod manifest;
pub mod page_path;
mod path_cache;
#[allow(clippy::module_inception)]
mod resolver;

pub use error::ResolveError;
pub use path_cache::{ModulePathCache, PagePathKey, PathCacheStats};
pub use resolver::{LoadedPage, VirtualAssetResolver};
