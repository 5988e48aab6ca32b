//! Logging abstraction used by the cache and resolver.
//!
//! Components that report conditions they cannot return to a caller (a
//! background regeneration failing after its waiters already got a value, for
//! instance) take an `Arc<dyn Logger>` instead of calling `tracing` directly.
//! The host decides where those lines end up.
//!
//! - `Logger`: the interface components depend on
//! - `TracingLogger`: forwards to the `tracing` crate (production)
//! - `NoOpLogger`: discards everything
//! - `MemoryLogger`: keeps lines in memory so callers can inspect them
//!
//! ```
//! use edgeshim::log::{Logger, MemoryLogger};
//! use edgeshim::log_warn;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(MemoryLogger::new());
//! log_warn!(logger, "regeneration for {} failed", "/products/42");
//! assert!(logger.contains("/products/42"));
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
