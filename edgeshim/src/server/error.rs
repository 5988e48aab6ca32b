//! Render server errors.

use thiserror::Error;

use crate::resolver::ResolveError;

/// Errors that abort a request instead of becoming a 404 or 500 response.
#[derive(Debug, Clone, Error)]
pub enum ServerError {
    /// The build output is unusable
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A module does not export what its route requires
    #[error("module {path} does not export a {expected}")]
    InvalidModule { path: String, expected: &'static str },
}

impl ServerError {
    pub(crate) fn invalid_module(path: &str, expected: &'static str) -> Self {
        Self::InvalidModule {
            path: path.to_string(),
            expected,
        }
    }
}
