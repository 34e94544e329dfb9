use crate::{AuditEvent, AuditSink, Error, Result};
use async_trait::async_trait;
use rev_buf_reader::RevBufReader;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

/// Represents an audit log file.
pub struct AuditLogFile {
    file_path: PathBuf,
}

impl AuditLogFile {
    /// Create an audit log file reader.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        if !file_path.is_file() {
            return Err(Error::NotFile(file_path));
        }
        Ok(Self { file_path })
    }

    /// Log file path.
    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }

    /// Read events from the log.
    ///
    /// When `reverse` is set the newest events come first. At most
    /// `count` events are returned when a limit is given. Lines that
    /// do not parse are skipped.
    pub fn events(
        &self,
        reverse: bool,
        count: Option<usize>,
    ) -> Result<Vec<AuditEvent>> {
        let file = File::open(&self.file_path)?;
        let lines: Box<dyn Iterator<Item = std::io::Result<String>>> =
            if reverse {
                Box::new(RevBufReader::new(file).lines())
            } else {
                Box::new(BufReader::new(file).lines())
            };

        let limit = count.unwrap_or(usize::MAX);
        let mut events = Vec::new();
        for line in lines {
            if events.len() >= limit {
                break;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match AuditEvent::decode_line(&line) {
                Ok(event) => events.push(event),
                // Foreign lines can appear when the file is shared
                Err(error) => {
                    tracing::debug!(error = %error, "audit::skip_line");
                }
            }
        }
        Ok(events)
    }
}

/// Audit file provider.
///
/// Appends are serialized through a mutex and every write is
/// flushed and synced before returning.
pub struct AuditFileProvider {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl AuditFileProvider {
    /// Create a new audit file provider.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_owned(),
            lock: Mutex::new(()),
        }
    }

    /// Path to the log file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl AuditSink for AuditFileProvider {
    type Error = crate::Error;

    async fn append_audit_events(&self, events: &[AuditEvent]) -> Result<()> {
        // Make a single buffer of all audit events
        let mut buffer = String::new();
        for event in events {
            buffer.push_str(&event.encode_line()?);
            buffer.push('\n');
        }

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use anyhow::Result;
    use tempfile::tempdir;

    #[tokio::test]
    async fn append_and_read_events() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs").join("node.log");
        let provider = AuditFileProvider::new(&path);

        provider
            .append_audit_events(&[AuditEvent::new(
                EventKind::Boot,
                "Starting Node1 with neighbors []",
            )])
            .await?;
        provider
            .append_audit_events(&[
                AuditEvent::new(EventKind::Send, "Node1 returned its share"),
                AuditEvent::new(
                    EventKind::Reconstruct,
                    "master key reconstructed",
                ),
            ])
            .await?;

        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(3, contents.lines().count());

        let log = AuditLogFile::new(&path)?;
        let events = log.events(false, None)?;
        let kinds: Vec<_> = events.iter().map(|e| e.event_kind()).collect();
        assert_eq!(
            vec![EventKind::Boot, EventKind::Send, EventKind::Reconstruct],
            kinds
        );

        let newest = log.events(true, Some(1))?;
        assert_eq!(1, newest.len());
        assert_eq!("master key reconstructed", newest[0].message());
        Ok(())
    }

    #[tokio::test]
    async fn existing_content_is_preserved() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("node.log");
        std::fs::write(&path, "not an audit record\n")?;

        let provider = AuditFileProvider::new(&path);
        provider
            .append_audit_events(&[AuditEvent::new(EventKind::Join, "hi")])
            .await?;

        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with("not an audit record\n"));

        let events = AuditLogFile::new(&path)?.events(false, None)?;
        assert_eq!(1, events.len());
        assert_eq!(EventKind::Join, events[0].event_kind());
        Ok(())
    }

    #[test]
    fn missing_log_is_not_a_file() {
        let result = AuditLogFile::new("/definitely/not/here.log");
        assert!(matches!(result, Err(Error::NotFile(_))));
    }
}
