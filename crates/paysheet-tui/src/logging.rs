use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log directory: `<cache_dir>/paysheet/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("paysheet").join("logs"))
}

/// Install a daily-rolling file subscriber. The terminal belongs to the UI, so
/// nothing is written to stderr.
///
/// `level` wins over `RUST_LOG`; with neither set the filter is `info`.
/// Returns `None` (logging disabled) when no cache directory is available.
/// Keep the guard alive until exit so buffered lines are flushed.
pub fn init(level: Option<&str>) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let appender = tracing_appender::rolling::daily(&dir, "paysheet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
