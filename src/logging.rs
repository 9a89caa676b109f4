//! Logging setup: stdout plus a daily rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Rotated files kept on disk, one per day.
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` with `info` as the floor. File output
/// goes through a background writer; the returned guard must be held until
/// exit. If the log directory is unusable, logging continues on stdout only.
pub fn init_logging(log_path: impl AsRef<Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let log_path = log_path.as_ref();
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let (file_layer, guard, file_error) = match file_writer(log_path) {
        Ok((writer, guard)) => (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
            None,
        ),
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    if let Some(e) = file_error {
        tracing::warn!("Could not open log file {}: {}", log_path.display(), e);
    }

    Ok(guard)
}

/// Non-blocking writer rolling `log_path` daily as `<name>.YYYY-MM-DD`.
fn file_writer(log_path: &Path) -> Result<(NonBlocking, WorkerGuard), InitError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = log_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "discord_bot.log".to_string());

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(MAX_LOG_FILES)
        .build(directory)?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_file_writer_rolls_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let (mut writer, guard) = file_writer(&dir.path().join("discord_bot.log")).unwrap();

        writer.write_all(b"INFO pingbot: hello\n").unwrap();
        drop(guard);

        let files: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("discord_bot.log."));

        let content = fs::read_to_string(dir.path().join(&files[0])).unwrap();
        assert_eq!(content, "INFO pingbot: hello\n");
    }

    #[test]
    fn test_file_writer_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("bot.log");

        let (_writer, _guard) = file_writer(&nested).unwrap();

        assert!(dir.path().join("logs").is_dir());
    }
}
