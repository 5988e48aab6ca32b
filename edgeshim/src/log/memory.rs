//! Logger that keeps lines in memory.

use crate::log::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// One captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that stores formatted lines, oldest first.
///
/// Used by tests that assert a failure was reported rather than raised, and
/// by hosts that surface recent warnings on a diagnostics endpoint.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured line.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Captured lines at `level` or above.
    pub fn at_least(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level >= level)
            .cloned()
            .collect()
    }

    /// Whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records.lock().iter().any(|r| r.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.records.lock().push(LogRecord {
            level,
            message: args.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{log_error, log_info};

    #[test]
    fn test_records_in_order() {
        let logger = MemoryLogger::new();
        log_info!(logger, "first {}", 1);
        log_error!(logger, "second {}", 2);

        let records = logger.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first 1");
        assert_eq!(records[1].level, LogLevel::Error);
    }

    #[test]
    fn test_at_least_filters_by_level() {
        let logger = MemoryLogger::new();
        logger.debug(format_args!("noise"));
        logger.warn(format_args!("careful"));
        logger.error(format_args!("broken"));

        let loud = logger.at_least(LogLevel::Warn);
        assert_eq!(loud.len(), 2);
        assert!(loud.iter().all(|r| r.level >= LogLevel::Warn));
    }

    #[test]
    fn test_clear() {
        let logger = MemoryLogger::new();
        logger.info(format_args!("x"));
        assert!(!logger.is_empty());
        logger.clear();
        assert!(logger.is_empty());
        assert!(!logger.contains("x"));
    }
}
