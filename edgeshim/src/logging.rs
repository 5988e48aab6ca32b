//! Tracing subscriber setup for hosts embedding edgeshim.
//!
//! - Writes to `<dir>/<file>` (truncated at startup) through a non-blocking
//!   writer
//! - Mirrors to stdout with ANSI colours
//! - Filter comes from `RUST_LOG`, falling back to the configured default

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "edgeshim.log";

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Keeps the background log writer alive.
///
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber with a file layer and a stdout layer,
/// filtered by `RUST_LOG` or [`DEFAULT_FILTER`].
///
/// Creates `log_dir` if needed and clears any previous `log_file` in it.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the file
/// cannot be truncated. Calling this twice in one process panics inside
/// `tracing-subscriber`, so hosts call it exactly once at startup.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    init_logging_full(log_dir, log_file, true, DEFAULT_FILTER)
}

/// [`init_logging`] with the stdout layer optional and an explicit
/// fallback filter.
///
/// Tools that write their results to stdout disable the stdout layer so
/// log lines never interleave with output.
pub fn init_logging_full(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    fallback_filter: &str,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(fallback_filter))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// `RUST_LOG` if set and valid, otherwise `fallback`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Create the directory and truncate the log file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<(), io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")
}
