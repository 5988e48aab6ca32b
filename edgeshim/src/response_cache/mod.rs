//! Single-flight response cache.
//!
//! Concurrent requests for the same cache key share one invocation of the
//! response generator. The most recent revalidatable entry is kept for a
//! short grace window so a burst of requests arriving just after a
//! regeneration does not trigger another one.
//!
//! # Architecture
//!
//! ```text
//! Request A ─┐
//!            │                          spawned
//! Request B ─┼──► ResponseCache ──────► generator task
//!            │        │    ▲                 │
//! Request C ─┘        │    └─ previous item ◄┤
//!                     ▼                      │
//!               [A, B, C all           ResolutionHandle
//!                receive the  ◄──────── (first value wins)
//!                same entry]
//! ```
//!
//! Pending generations live in a `DashMap` keyed by cache key plus a
//! manual-revalidation discriminator; registration uses the entry API so two
//! callers can never both start a generation for the same key.

mod cache;
mod entry;
mod error;
mod handle;
mod stats;

pub use cache::ResponseCache;
pub use entry::{CacheContext, Headers, ResponseEntry, ResponseValue, Revalidate};
pub use error::{GenerationError, ResponseCacheError};
pub use handle::ResolutionHandle;
pub use stats::ResponseCacheStats;
