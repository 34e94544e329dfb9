#![deny(missing_docs)]
#![forbid(unsafe_code)]
//! Audit trail logging.
//!
//! Every step of share exchange and reconstruction appends one
//! timestamped line to a local, append-only log. Records describe
//! what happened; they never contain share bytes, the master
//! secret or derived keys.
mod encoding;
mod error;
mod event;
pub mod fs;

pub use error::Error;
pub use event::*;

use std::sync::Arc;

/// Result type for the library.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Trait for types that append to an audit log.
#[async_trait::async_trait]
pub trait AuditSink {
    /// Error type for this implementation.
    type Error;

    /// Append audit log records to a destination.
    async fn append_audit_events(
        &self,
        events: &[AuditEvent],
    ) -> std::result::Result<(), Self::Error>;
}

/// Shared audit sink.
pub type BoxedAuditSink =
    Arc<dyn AuditSink<Error = Error> + Send + Sync + 'static>;
