//! Caller-facing timestamp input.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::TimeError;
use crate::instant::Instant;

/// A timestamp as supplied by a caller.
///
/// Geometry entry points accept `Timestamp`s and convert them with
/// `Instant::try_from`, which is where naive values are turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Datetime with an explicit UTC offset.
    Aware(DateTime<FixedOffset>),
    /// Datetime without offset information.
    Naive(NaiveDateTime),
    /// Pre-formatted UTC text (`%Y-%m-%d %H:%M:%S` or RFC 3339).
    Text(String),
}

impl Timestamp {
    pub fn is_naive(&self) -> bool {
        matches!(self, Self::Naive(_))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Aware(dt)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Naive(dt)
    }
}

impl From<Instant> for Timestamp {
    fn from(instant: Instant) -> Self {
        Self::from(instant.utc())
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl TryFrom<&Timestamp> for Instant {
    type Error = TimeError;

    fn try_from(ts: &Timestamp) -> Result<Self, Self::Error> {
        match ts {
            Timestamp::Aware(dt) => Ok(Instant::from_aware(dt)),
            Timestamp::Text(s) => s.parse(),
            Timestamp::Naive(naive) => {
                warn!(
                    timestamp = %naive,
                    "timezone-naive timestamp rejected; attach a UTC offset"
                );
                Err(TimeError::NaiveTimestamp(naive.to_string()))
            }
        }
    }
}

impl TryFrom<Timestamp> for Instant {
    type Error = TimeError;

    fn try_from(ts: Timestamp) -> Result<Self, Self::Error> {
        Instant::try_from(&ts)
    }
}
