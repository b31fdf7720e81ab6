//! Analytic Sun/Moon ephemeris.
//!
//! [`AnalyticEphemeris`] implements [`EphemerisProvider`] from truncated
//! series, with no kernel files. It answers queries between the Sun, Earth
//! and Moon in the inertial, Earth-fixed and Moon-fixed frames. Pair it with
//! [`luna_core::KernelSet`] to add observer sites.

pub mod moon;
pub mod orientation;
pub mod sun;

use luna_core::{AdapterError, Body, EphemerisProvider, Frame, Query};
use luna_frames::{IDENTITY, Mat3, Vec3, mxm, mxv, sub, transpose};
use luna_time::Instant;

pub use moon::moon_ecliptic;
pub use orientation::{
    earth_fixed_matrix, ecliptic_of_date_to_inertial, mean_obliquity_deg, moon_fixed_matrix,
    moon_pole_and_meridian_deg, precession_matrix,
};
pub use sun::{AU_KM, sun_ecliptic};

/// Geocentric ecliptic coordinates, mean equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance_km: f64,
}

/// Series validity window in Julian centuries from J2000.
const COVERAGE_CENTURIES: f64 = 4.0;

/// Kernel-free provider for the Sun, Earth and Moon.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn check_coverage(instant: &Instant) -> Result<f64, AdapterError> {
        let t = instant.centuries_since_j2000_tt();
        if t.abs() > COVERAGE_CENTURIES {
            return Err(AdapterError::EpochOutOfRange {
                instant: instant.to_string(),
            });
        }
        Ok(t)
    }

    /// Geocentric inertial position of a natural body.
    fn geocentric(body: Body, t: f64) -> Result<Vec3, AdapterError> {
        match body {
            Body::Earth => Ok([0.0; 3]),
            Body::Moon => Ok(ecliptic_of_date_to_inertial(&moon_ecliptic(t), t)),
            Body::Sun => Ok(ecliptic_of_date_to_inertial(&sun_ecliptic(t), t)),
            Body::Site(code) => Err(AdapterError::UnsupportedBody(code)),
        }
    }

    fn inertial_to(frame: Frame, instant: &Instant) -> Mat3 {
        match frame {
            Frame::Inertial => IDENTITY,
            Frame::EarthFixed => earth_fixed_matrix(instant),
            Frame::MoonFixed => moon_fixed_matrix(instant),
        }
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        query.validate()?;
        let t = Self::check_coverage(instant)?;
        let target = Self::geocentric(query.target, t)?;
        let center = Self::geocentric(query.center, t)?;
        let inertial = sub(&target, &center);
        Ok(match query.frame {
            Frame::Inertial => inertial,
            frame => mxv(&Self::inertial_to(frame, instant), &inertial),
        })
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        Self::check_coverage(instant)?;
        if from == to {
            return Ok(IDENTITY);
        }
        let from_m = Self::inertial_to(from, instant);
        let to_m = Self::inertial_to(to, instant);
        Ok(mxm(&to_m, &transpose(&from_m)))
    }
}
