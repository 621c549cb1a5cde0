//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "canvasforge.log";
const DEFAULT_FILTER: &str = "info,canvasforge=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Append a session separator so runs are easy to tell apart in the log file
fn write_session_separator(log_file_path: &Path) {
    if let Ok(mut file) = OpenOptions::new().append(true).open(log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }
}

/// Console-only subscriber, used for release builds and when the log
/// directory cannot be created
fn init_stdout_only() {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .try_init();
}

/// Log to stdout and, in debug builds, to `logs/canvasforge.log`.
///
/// The returned guard must be kept alive for the file writer to flush.
pub fn setup_logging(logs_dir: &Path) -> Option<WorkerGuard> {
    if !cfg!(debug_assertions) {
        init_stdout_only();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!("Failed to create logs directory {:?}: {}", logs_dir, e);
        init_stdout_only();
        return None;
    }

    write_session_separator(&logs_dir.join(LOG_FILE_NAME));

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI colors in the file
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stdout_layer)
        .try_init();

    Some(guard)
}
