//! Audit events.
use crate::Error;
use edgefed_core::UtcDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kinds of audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// Node started.
    Boot,
    /// Join message received from another node.
    Join,
    /// Share served to a peer, or refused.
    Send,
    /// Share pulled from a neighbor, or the pull failed.
    Request,
    /// Master secret combined, or not enough shares.
    Reconstruct,
    /// Secure partition decrypted, or decryption failed.
    Decrypt,
}

impl EventKind {
    /// Tag used in the log line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boot => "BOOT",
            Self::Join => "JOIN",
            Self::Send => "SEND",
            Self::Request => "REQUEST",
            Self::Reconstruct => "RECONSTRUCT",
            Self::Decrypt => "DECRYPT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BOOT" => Self::Boot,
            "JOIN" => Self::Join,
            "SEND" => Self::Send,
            "REQUEST" => Self::Request,
            "RECONSTRUCT" => Self::Reconstruct,
            "DECRYPT" => Self::Decrypt,
            _ => return Err(Error::UnknownKind(s.to_owned())),
        })
    }
}

/// Audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub(crate) time: UtcDateTime,
    pub(crate) event_kind: EventKind,
    pub(crate) message: String,
}

impl AuditEvent {
    /// Create a new audit event stamped with the current time.
    pub fn new(event_kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            time: Default::default(),
            event_kind,
            message: message.into(),
        }
    }

    /// Date and time the event was created.
    pub fn time(&self) -> &UtcDateTime {
        &self.time
    }

    /// Event kind.
    pub fn event_kind(&self) -> EventKind {
        self.event_kind
    }

    /// Event message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
