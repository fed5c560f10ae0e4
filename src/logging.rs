//! Tracing setup
//!
//! Logs are JSON lines appended to `eolctl.log` in the data dir. When that
//! file can't be opened, logs go to stderr instead.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Default level when neither the flag nor the config sets one
pub const DEFAULT_LEVEL: &str = "info";

/// Filter for `level`, falling back to [`DEFAULT_LEVEL`] if it doesn't parse
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

fn file_appender(log_path: &Path) -> Option<RollingFileAppender> {
    let dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    std::fs::create_dir_all(dir).ok()?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .ok()
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines on drop and must be held until
/// the process exits. `None` when logging fell back to stderr.
pub fn init(level: &str, log_path: &Path) -> Option<WorkerGuard> {
    let builder = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(level));

    match file_appender(log_path) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).try_init().ok()?;
            Some(guard)
        }
        None => {
            // Ignored: a subscriber may already be installed
            let _ = builder.with_writer(std::io::stderr).try_init();
            None
        }
    }
}
