//! Errors raised by ephemeris providers and the kernel layer.

use thiserror::Error;

/// Errors from the ephemeris collaborator.
///
/// The geometry engine propagates these unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AdapterError {
    #[error("unsupported body code {0}")]
    UnsupportedBody(i32),
    #[error("unsupported frame transformation {from} -> {to}")]
    UnsupportedFrame {
        from: &'static str,
        to: &'static str,
    },
    #[error("target and center cannot both be body {0}")]
    IdenticalBodies(i32),
    #[error("site {0} is not registered")]
    MissingSite(i32),
    #[error("site code {0} is already registered")]
    DuplicateSite(i32),
    #[error("site code {0} is reserved for a natural body")]
    ReservedCode(i32),
    #[error("invalid site: {0}")]
    InvalidSite(&'static str),
    #[error("instant {instant} outside provider coverage")]
    EpochOutOfRange { instant: String },
    #[error("provider error: {0}")]
    Provider(String),
}
