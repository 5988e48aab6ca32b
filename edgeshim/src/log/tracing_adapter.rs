//! Adapter from [`Logger`] to the `tracing` crate.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger that forwards every line to `tracing`.
///
/// Output depends on the subscriber installed by the host, normally the one
/// from [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "edgeshim", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "edgeshim", "{}", args),
            LogLevel::Info => tracing::info!(target: "edgeshim", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "edgeshim", "{}", args),
            LogLevel::Error => tracing::error!(target: "edgeshim", "{}", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: lines are dropped by tracing itself.
        let logger: Box<dyn Logger> = Box::new(TracingLogger::new());
        logger.warn(format_args!("no subscriber"));
        logger.debug(format_args!("still fine"));
    }

    #[test]
    fn test_tracing_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingLogger>();
    }
}
