//! Error types for timestamp validation and parsing.

use thiserror::Error;

/// Errors from turning caller timestamps into [`crate::Instant`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Timestamp carries no UTC offset and cannot be placed on the time axis.
    #[error("timestamp `{0}` has no UTC offset")]
    NaiveTimestamp(String),
    /// Text timestamp matches none of the accepted formats.
    #[error("unparseable timestamp `{0}`")]
    Unparseable(String),
    /// Arithmetic left the representable date range.
    #[error("instant out of representable range")]
    OutOfRange,
}
