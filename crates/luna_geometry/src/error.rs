//! Error taxonomy of the geometry engine.

use luna_core::AdapterError;
use luna_time::TimeError;
use thiserror::Error;

/// Errors returned by every geometry operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// Caller input rejected before any geometry ran: naive timestamps,
    /// non-finite values, out-of-range coordinates, mismatched lengths.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Geometry is undefined for the given vectors (zero length, no
    /// ellipsoid intercept).
    #[error("degenerate geometry: {0}")]
    Domain(&'static str),
    /// Ephemeris adapter failure, passed through unchanged.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl From<TimeError> for GeometryError {
    fn from(e: TimeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub(crate) fn require_finite(values: &[f64], what: &str) -> Result<(), GeometryError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::InvalidInput(format!("{what} must be finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_errors_display_transparently() {
        let inner = AdapterError::UnsupportedBody(42);
        let outer = GeometryError::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }

    #[test]
    fn naive_time_becomes_invalid_input() {
        let e = GeometryError::from(TimeError::NaiveTimestamp("2024-01-25 17:54:00".into()));
        assert!(matches!(e, GeometryError::InvalidInput(_)));
    }

    #[test]
    fn finite_check() {
        assert!(require_finite(&[1.0, -2.0], "x").is_ok());
        assert!(require_finite(&[1.0, f64::NAN], "x").is_err());
    }
}
