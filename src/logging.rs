//! Tracing setup for the binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

/// Builds the filter: `RUST_LOG` if set, otherwise `level` for this crate and
/// warnings for everything else.
#[must_use]
pub fn filter(level: LogLevel) -> EnvFilter {
    let level = level.as_tracing_level().as_str().to_ascii_lowercase();
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))))
}

/// Sends all log output to `path`.
///
/// Logging stops when the returned guard is dropped; hold it for the life of
/// the process.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(path: &Path, level: LogLevel) -> color_eyre::Result<WorkerGuard> {
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    let file_name = path.file_name().unwrap_or(path.as_os_str());
    let appender = tracing_appender::rolling::never(directory.unwrap_or(Path::new(".")), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter(level))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(guard)
}
