//! UTC-aware instants, Julian dates and timestamp formatting.
//!
//! This crate provides:
//! - [`Instant`], a point in time that always carries UTC offset information
//! - [`Timestamp`], the caller-facing input that may still be naive
//! - `dt_to_str`-style formatting that warns on naive input instead of failing
//! - Earth rotation angle and GMST for body-fixed Earth frames

pub mod error;
pub mod format;
pub mod instant;
pub mod julian;
pub mod sidereal;
pub mod timestamp;

pub use error::TimeError;
pub use format::{FormattedTime, UTC_FORMAT, dt_to_str, format_timestamp};
pub use instant::Instant;
pub use julian::{J2000_JD, SECONDS_PER_DAY, TT_MINUS_UTC_S, UNIX_EPOCH_JD};
pub use sidereal::{earth_rotation_angle_rad, gmst_rad, local_sidereal_time_rad};
pub use timestamp::Timestamp;
