//! Audit trail provider backed by an append-only file.
mod log_file;

pub use log_file::{AuditFileProvider, AuditLogFile};
