//! UTC date and time used to stamp audit records and tokens.
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Date and time in UTC.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Ord, PartialOrd, Eq, PartialEq,
)]
pub struct UtcDateTime(
    #[serde(with = "time::serde::rfc3339")] pub(crate) OffsetDateTime,
);

impl Default for UtcDateTime {
    fn default() -> Self {
        Self(OffsetDateTime::now_utc())
    }
}

impl UtcDateTime {
    /// Create a UTC date time for now.
    pub fn now() -> Self {
        Default::default()
    }

    /// Create from seconds since the UNIX epoch.
    pub fn from_unix_timestamp(seconds: i64) -> Result<Self> {
        Ok(Self(OffsetDateTime::from_unix_timestamp(seconds)?))
    }

    /// Seconds since the UNIX epoch.
    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Parse as RFC3339.
    pub fn parse_rfc3339(value: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(value, &Rfc3339)?;
        Ok(Self(datetime.to_offset(time::UtcOffset::UTC)))
    }

    /// Convert this date and time to a RFC3339 formatted string.
    pub fn to_rfc3339(&self) -> Result<String> {
        Ok(self.0.format(&Rfc3339)?)
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(value) => write!(f, "{}", value),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl From<UtcDateTime> for OffsetDateTime {
    fn from(value: UtcDateTime) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::UtcDateTime;
    use anyhow::Result;

    #[test]
    fn rfc3339_parse_format() -> Result<()> {
        let value = "1985-10-26T08:20:00Z";
        let date = UtcDateTime::parse_rfc3339(value)?;
        assert_eq!(499162800, date.unix_timestamp());
        assert_eq!(value, date.to_rfc3339()?);

        let offset = UtcDateTime::parse_rfc3339("1985-10-26T01:20:00-07:00")?;
        assert_eq!(date, offset);
        Ok(())
    }
}
