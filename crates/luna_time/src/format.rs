//! Display formatting of caller timestamps.
//!
//! This is the soft path: a naive timestamp is not an error here. It is
//! logged with `tracing::warn!`, interpreted as machine-local time, and
//! still formatted.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::timestamp::Timestamp;

/// UTC string format shared with ephemeris toolkits.
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A formatted timestamp plus whether it was produced from naive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTime {
    pub text: String,
    /// `true` when the source had no offset and a warning was emitted.
    pub naive: bool,
}

/// Format one timestamp as a UTC string.
///
/// - `Aware`: converted to UTC.
/// - `Naive`: warning, then read as machine-local time (UTC if the local
///   time does not exist, e.g. inside a DST gap).
/// - `Text`: RFC 3339 text is converted to UTC; anything else, including
///   the `%Y-%m-%d %H:%M:%S` form, is returned unchanged.
pub fn format_timestamp(ts: &Timestamp) -> FormattedTime {
    match ts {
        Timestamp::Aware(dt) => FormattedTime {
            text: dt.with_timezone(&Utc).format(UTC_FORMAT).to_string(),
            naive: false,
        },
        Timestamp::Text(s) => FormattedTime {
            text: match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(dt) => dt.with_timezone(&Utc).format(UTC_FORMAT).to_string(),
                Err(_) => s.clone(),
            },
            naive: false,
        },
        Timestamp::Naive(naive) => {
            warn!(
                timestamp = %naive,
                "timezone-naive timestamp formatted as local time"
            );
            FormattedTime {
                text: naive_as_local_utc(naive).format(UTC_FORMAT).to_string(),
                naive: true,
            }
        }
    }
}

/// Format a list of timestamps as UTC strings, in order.
pub fn dt_to_str(timestamps: &[Timestamp]) -> Vec<String> {
    timestamps
        .iter()
        .map(|ts| format_timestamp(ts).text)
        .collect()
}

fn naive_as_local_utc(naive: &NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => naive.and_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn aware_is_converted_to_utc() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = tz.with_ymd_and_hms(2022, 1, 16, 19, 0, 0).unwrap();
        let f = format_timestamp(&Timestamp::from(dt));
        assert_eq!(f.text, "2022-01-17 00:00:00");
        assert!(!f.naive);
    }

    #[test]
    fn text_passes_through() {
        let out = dt_to_str(&["2022-01-17 00:00:00".into(), "garbage".into()]);
        assert_eq!(out, vec!["2022-01-17 00:00:00", "garbage"]);
    }

    #[test]
    fn rfc3339_text_is_converted_to_utc() {
        let f = format_timestamp(&"2022-01-17T02:30:00+02:00".into());
        assert_eq!(f.text, "2022-01-17 00:30:00");
        assert!(!f.naive);
        let z = format_timestamp(&"2024-01-25T17:54:00Z".into());
        assert_eq!(z.text, "2024-01-25 17:54:00");
    }

    #[test]
    fn naive_still_formats() {
        let naive = NaiveDate::from_ymd_opt(2022, 1, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let f = format_timestamp(&Timestamp::from(naive));
        assert!(f.naive);
        assert_eq!(f.text.len(), "2022-01-17 12:00:00".len());
        assert!(f.text.starts_with("2022-01-1"));
    }
}
