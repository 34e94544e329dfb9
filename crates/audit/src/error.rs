use std::path::PathBuf;
use thiserror::Error;

/// Errors generated by the audit library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a path is not a file.
    #[error("{0} is not a file")]
    NotFile(PathBuf),

    /// Error generated when a log line cannot be parsed.
    #[error("malformed audit record: {0}")]
    MalformedRecord(String),

    /// Error generated when an event kind is not recognized.
    #[error("unknown audit event kind {0}")]
    UnknownKind(String),

    /// Error generated by the core library.
    #[error(transparent)]
    Core(#[from] edgefed_core::Error),

    /// Error generated by the io module.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
