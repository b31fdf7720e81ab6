//! UTC-aware instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Utc};
use tracing::warn;

use crate::error::TimeError;
use crate::format::UTC_FORMAT;
use crate::julian::{
    DAYS_PER_CENTURY, J2000_JD, J2000_UNIX_S, SECONDS_PER_DAY, TT_MINUS_UTC_S, UNIX_EPOCH_JD,
};

/// A point in time with a known UTC offset.
///
/// Only constructible from offset-carrying values; naive datetimes go through
/// [`crate::Timestamp`] and are rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    utc: DateTime<Utc>,
}

impl Instant {
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        Self { utc }
    }

    /// Create from any timezone-aware datetime, normalizing to UTC.
    pub fn from_aware<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            utc: dt.with_timezone(&Utc),
        }
    }

    /// Create from a UTC calendar date and time.
    pub fn from_utc_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .map(Self::from_utc)
            .ok_or(TimeError::OutOfRange)
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    /// UTC seconds since 2000-01-01 12:00:00 UTC.
    pub fn utc_seconds_since_j2000(&self) -> f64 {
        (self.utc.timestamp() - J2000_UNIX_S) as f64
            + f64::from(self.utc.timestamp_subsec_nanos()) * 1e-9
    }

    /// Julian Date in UTC.
    pub fn jd_utc(&self) -> f64 {
        J2000_JD + self.utc_seconds_since_j2000() / SECONDS_PER_DAY
    }

    /// Julian Date in TT.
    pub fn jd_tt(&self) -> f64 {
        J2000_JD + self.days_since_j2000_tt()
    }

    /// TT days since J2000.0. TDB differs by < 2 ms, which the analytic
    /// models ignore.
    pub fn days_since_j2000_tt(&self) -> f64 {
        (self.utc_seconds_since_j2000() + TT_MINUS_UTC_S) / SECONDS_PER_DAY
    }

    /// TT Julian centuries since J2000.0.
    pub fn centuries_since_j2000_tt(&self) -> f64 {
        self.days_since_j2000_tt() / DAYS_PER_CENTURY
    }

    /// Shift by a (possibly fractional, possibly negative) number of seconds.
    pub fn plus_seconds(&self, seconds: f64) -> Result<Self, TimeError> {
        if !seconds.is_finite() {
            return Err(TimeError::OutOfRange);
        }
        let nanos = (seconds * 1e9).round();
        if nanos.abs() >= i64::MAX as f64 {
            return Err(TimeError::OutOfRange);
        }
        self.utc
            .checked_add_signed(TimeDelta::nanoseconds(nanos as i64))
            .map(Self::from_utc)
            .ok_or(TimeError::OutOfRange)
    }

    /// `%Y-%m-%d %H:%M:%S` in UTC, the format ephemeris toolkits accept.
    pub fn to_utc_string(&self) -> String {
        self.utc.format(UTC_FORMAT).to_string()
    }

    /// Julian Date in UTC converted back to an instant (millisecond rounding).
    pub fn from_jd_utc(jd: f64) -> Result<Self, TimeError> {
        if !jd.is_finite() {
            return Err(TimeError::OutOfRange);
        }
        let ms = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
        if ms.abs() >= i64::MAX as f64 {
            return Err(TimeError::OutOfRange);
        }
        DateTime::<Utc>::from_timestamp_millis(ms as i64)
            .map(Self::from_utc)
            .ok_or(TimeError::OutOfRange)
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(utc: DateTime<Utc>) -> Self {
        Self::from_utc(utc)
    }
}

impl From<DateTime<FixedOffset>> for Instant {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::from_aware(&dt)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.utc.format("%Y-%m-%dT%H:%M:%S%.fZ"))
    }
}

/// Parses RFC 3339 (any offset) or `%Y-%m-%d %H:%M:%S`, which is read as UTC.
///
/// An ISO datetime without offset (`2024-01-25T17:54:00`) is rejected as
/// naive. The space-separated form is the ephemeris-toolkit UTC convention.
impl FromStr for Instant {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_aware(&dt));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, UTC_FORMAT) {
            return Ok(Self::from_utc(naive.and_utc()));
        }
        if NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
            warn!(timestamp = trimmed, "ISO timestamp without offset rejected");
            return Err(TimeError::NaiveTimestamp(trimmed.to_string()));
        }
        Err(TimeError::Unparseable(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_utc_noon() {
        let t = Instant::from_utc_ymd_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(t.utc_seconds_since_j2000(), 0.0);
        assert_eq!(t.jd_utc(), J2000_JD);
        assert!((t.days_since_j2000_tt() * SECONDS_PER_DAY - TT_MINUS_UTC_S).abs() < 1e-9);
    }

    #[test]
    fn offset_is_normalized() {
        let madrid = FixedOffset::east_opt(3600).unwrap();
        let local = madrid.with_ymd_and_hms(2024, 1, 25, 18, 54, 0).unwrap();
        let t = Instant::from_aware(&local);
        assert_eq!(t.to_utc_string(), "2024-01-25 17:54:00");
    }

    #[test]
    fn parse_space_form_as_utc() {
        let t: Instant = "2022-01-17 00:30:00".parse().unwrap();
        assert_eq!(t.to_utc_string(), "2022-01-17 00:30:00");
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let t: Instant = "2022-01-17T02:30:00+02:00".parse().unwrap();
        assert_eq!(t.to_utc_string(), "2022-01-17 00:30:00");
    }

    #[test]
    fn parse_iso_without_offset_is_naive() {
        let err = "2022-01-17T00:30:00".parse::<Instant>().unwrap_err();
        assert!(matches!(err, TimeError::NaiveTimestamp(_)));
    }

    #[test]
    fn parse_garbage() {
        let err = "yesterday".parse::<Instant>().unwrap_err();
        assert!(matches!(err, TimeError::Unparseable(_)));
    }

    #[test]
    fn plus_seconds_fractional() {
        let t = Instant::from_utc_ymd_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let u = t.plus_seconds(1.5).unwrap();
        assert!((u.utc_seconds_since_j2000() - t.utc_seconds_since_j2000() - 1.5).abs() < 1e-9);
        assert!(t.plus_seconds(f64::NAN).is_err());
    }

    #[test]
    fn jd_roundtrip() {
        let t = Instant::from_utc_ymd_hms(2024, 1, 25, 17, 54, 0).unwrap();
        let back = Instant::from_jd_utc(t.jd_utc()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn display_is_iso_utc() {
        let t = Instant::from_utc_ymd_hms(2024, 1, 25, 17, 54, 0).unwrap();
        assert_eq!(t.to_string(), "2024-01-25T17:54:00Z");
    }
}
