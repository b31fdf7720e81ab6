//! Julian date constants.

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// TT − UTC in seconds: 37 leap seconds + 32.184 s (valid since 2017-01-01).
///
/// Kernel-backed providers apply the full leap-second table themselves;
/// this constant only feeds the analytic models.
pub const TT_MINUS_UTC_S: f64 = 69.184;

/// Unix timestamp of 2000-01-01 12:00:00 UTC.
pub(crate) const J2000_UNIX_S: i64 = 946_728_000;
