use crate::{AuditEvent, Error, Result};
use edgefed_core::UtcDateTime;

impl AuditEvent {
    /// Encode as a single log line without the trailing newline.
    ///
    /// Line breaks in the message are escaped so one event is
    /// always exactly one line.
    pub fn encode_line(&self) -> Result<String> {
        Ok(format!(
            "[{}] [{}] {}",
            self.time.to_rfc3339()?,
            self.event_kind,
            escape(&self.message)
        ))
    }

    /// Decode from a log line.
    pub fn decode_line(line: &str) -> Result<Self> {
        let malformed = || Error::MalformedRecord(line.to_owned());

        let rest = line.strip_prefix('[').ok_or_else(malformed)?;
        let (time, rest) = rest.split_once("] [").ok_or_else(malformed)?;
        let (kind, message) = rest.split_once(']').ok_or_else(malformed)?;
        let message = message.strip_prefix(' ').unwrap_or(message);

        Ok(Self {
            time: UtcDateTime::parse_rfc3339(time)?,
            event_kind: kind.parse()?,
            message: unescape(message),
        })
    }
}

fn escape(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Unknown escapes are kept as written.
fn unescape(message: &str) -> String {
    let mut unescaped = String::with_capacity(message.len());
    let mut chars = message.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
