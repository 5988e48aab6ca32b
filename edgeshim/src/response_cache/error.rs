//! Response cache errors.

use std::sync::Arc;

use thiserror::Error;

/// Error type returned by response generators.
pub type GenerationError = Box<dyn std::error::Error + Send + Sync>;

/// Errors delivered to callers of [`super::ResponseCache::get`].
///
/// Cloneable because every waiter on a generation receives the same outcome.
#[derive(Debug, Clone, Error)]
pub enum ResponseCacheError {
    /// The generator failed before any value was published
    #[error("response generation failed: {0}")]
    Generation(Arc<dyn std::error::Error + Send + Sync>),

    /// The generator task ended without publishing (it panicked)
    #[error("response generation for {key} ended without a result")]
    Abandoned { key: String },
}

impl ResponseCacheError {
    /// The generator's own error, if this is a generation failure.
    pub fn generation_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Generation(err) => Some(err.as_ref()),
            Self::Abandoned { .. } => None,
        }
    }
}
