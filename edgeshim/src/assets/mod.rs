//! In-memory asset store standing in for the build output directory.
//!
//! The edge runtime has no filesystem, so everything the server would read
//! from disk (manifests, prerendered HTML, compiled page modules) is looked
//! up in an [`AssetStore`] instead. Keys are logical paths relative to the
//! project directory with a leading slash, e.g. `/.next/server/pages/index.js`.
//!
//! Content assets and executable modules live in separate tables: a
//! content lookup never returns a module and vice versa.

mod error;
mod module;
pub mod path;
mod store;

pub use error::AssetError;
pub use module::ModuleRecord;
pub use store::{content_type_for, AssetMetadata, AssetRecord, AssetStore, InMemoryAssetStore};
