use crate::Result;
use std::path::{Path, PathBuf};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "edgefed=info,tower_http=info";

/// Writes tracing output to stdout and to daily rolling
/// log files.
pub struct Logger {
    logs_dir: PathBuf,
    name: String,
}

impl Logger {
    /// Create a logger that writes files named after `name`
    /// into `logs_dir`.
    pub fn new(logs_dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            logs_dir: logs_dir.as_ref().to_path_buf(),
            name: name.into(),
        }
    }

    /// Directory for log files.
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Initialize a subscriber that writes JSON lines to disc
    /// and human readable lines to stdout.
    ///
    /// The returned guard must be held for the lifetime of the
    /// program so buffered lines reach the file.
    pub fn init_file_subscriber(
        &self,
        default_log_level: Option<String>,
    ) -> Result<WorkerGuard> {
        std::fs::create_dir_all(&self.logs_dir)?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(self.name.clone())
            .filename_suffix("log")
            .build(&self.logs_dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let file_layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(writer);

        let stdout_layer = fmt::layer().with_target(false);

        tracing_subscriber::registry()
            .with(env_filter(default_log_level))
            .with(file_layer)
            .with(stdout_layer)
            .try_init()?;

        Ok(guard)
    }

    /// Initialize a subscriber that only writes to stdout.
    pub fn init_stdout_subscriber(
        default_log_level: Option<String>,
    ) -> Result<()> {
        tracing_subscriber::registry()
            .with(env_filter(default_log_level))
            .with(fmt::layer().without_time())
            .try_init()?;
        Ok(())
    }
}

fn env_filter(default_log_level: Option<String>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            default_log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::Logger;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn file_subscriber_writes_log_file() -> Result<()> {
        let dir = tempdir()?;
        let logs_dir = dir.path().join("logs");
        let logger = Logger::new(&logs_dir, "edgefed-test");
        let guard = logger.init_file_subscriber(Some("info".to_owned()))?;
        tracing::info!(node = "Node1", "logger::test");
        drop(guard);

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&logs_dir)? {
            files.push(entry?.path());
        }
        assert_eq!(1, files.len());
        let name = files[0].file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("edgefed-test."));
        assert!(name.ends_with(".log"));

        let contents = std::fs::read_to_string(&files[0])?;
        assert!(contents.contains("logger::test"));

        // Only one global subscriber per process
        assert!(Logger::init_stdout_subscriber(None).is_err());
        Ok(())
    }
}
