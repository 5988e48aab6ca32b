//! Asset store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building an asset store.
///
/// Lookups never fail: a missing asset is `None`.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Reading the source directory failed
    #[error("failed to read asset source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file name could not be represented as a logical path
    #[error("asset path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// The asset root does not exist or is not a directory
    #[error("asset root is not a directory: {0}")]
    NotADirectory(PathBuf),
}
