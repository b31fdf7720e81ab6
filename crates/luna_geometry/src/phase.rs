//! Phase angle, phase sign and illuminated fraction.

use std::fmt;

use luna_frames::{Vec3, angle_between_rad, sub};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, require_finite};

/// Whether the observer sees more of the disk lit over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSign {
    Waxing,
    Waning,
}

impl PhaseSign {
    /// Multiplier for the signed phase angle: waxing phases are negative.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Waxing => -1.0,
            Self::Waning => 1.0,
        }
    }
}

impl fmt::Display for PhaseSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waxing => f.write_str("waxing"),
            Self::Waning => f.write_str("waning"),
        }
    }
}

/// Sun-Moon-observer angle in degrees, [0, 180].
///
/// All three vectors share one origin and frame.
pub fn compute_phase_angle(
    sun_vector: &Vec3,
    moon_vector: &Vec3,
    observer_vector: &Vec3,
) -> Result<f64, GeometryError> {
    require_finite(sun_vector, "sun vector")?;
    require_finite(moon_vector, "moon vector")?;
    require_finite(observer_vector, "observer vector")?;

    let to_sun = sub(sun_vector, moon_vector);
    let to_observer = sub(observer_vector, moon_vector);
    angle_between_rad(&to_sun, &to_observer)
        .map(f64::to_degrees)
        .ok_or(GeometryError::Domain("zero-length Moon-Sun or Moon-observer vector"))
}

/// Phase sign from selenographic longitudes (degrees) at one instant.
///
/// With `Δ = (sun − observer) mod 360`, `Δ ∈ [0, 180)` is waxing and
/// anything else waning. The Sun's selenographic longitude drifts west at
/// about 12.2°/day, so Δ crosses 0 at full moon and 180 at new moon.
pub fn compute_phase_sign(
    sun_selenographic_lon_deg: f64,
    observer_selenographic_lon_deg: f64,
) -> Result<PhaseSign, GeometryError> {
    require_finite(
        &[sun_selenographic_lon_deg, observer_selenographic_lon_deg],
        "selenographic longitudes",
    )?;
    let delta = (sun_selenographic_lon_deg - observer_selenographic_lon_deg).rem_euclid(360.0);
    if delta < 180.0 {
        Ok(PhaseSign::Waxing)
    } else {
        Ok(PhaseSign::Waning)
    }
}

/// `(1 + cos φ) / 2`, clamped to [0, 1].
pub fn compute_illuminated_fraction(phase_angle_deg: f64) -> Result<f64, GeometryError> {
    require_finite(&[phase_angle_deg], "phase angle")?;
    Ok(((1.0 + phase_angle_deg.to_radians().cos()) / 2.0).clamp(0.0, 1.0))
}
