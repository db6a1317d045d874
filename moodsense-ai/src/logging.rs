//! Tracing subscriber setup
//!
//! Always logs to stderr; `[logging] file` adds a non-blocking file sink.
//! `RUST_LOG` wins over the configured level.

use anyhow::{Context, Result};
use moodsense_common::config::LoggingConfig;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// The returned guard flushes the file sink on drop and must be held for
/// the life of the process.
pub fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let default_filter = format!("moodsense_ai={},tower_http={}", logging.level, logging.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, guard) = match &logging.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Non-blocking appender for a single, unrotated log file
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_creates_directory_and_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("moodsense-ai.log");

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"first line\n").unwrap();
        drop(writer);
        drop(guard);

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"second line\n").unwrap();
        drop(writer);
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first line\nsecond line\n");
    }

    #[test]
    fn test_file_writer_rejects_path_without_file_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }
}
