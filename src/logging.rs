//! File logging. The terminal belongs to the UI, so log lines go to a file
//! in the data directory.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `log_path`.
///
/// `RUST_LOG` takes precedence over `default_level`. Keep the returned guard
/// alive for the lifetime of the program so buffered lines are written out.
pub fn init(log_path: &Path, default_level: &str) -> io::Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .is_err()
    {
        // a subscriber is already installed, e.g. by a test harness
        tracing::debug!("global subscriber already set");
    }

    Ok(guard)
}
