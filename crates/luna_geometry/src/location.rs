//! Observer locations on the Earth or the Moon.

use luna_core::{Body, Frame, SiteSegment};
use luna_frames::{Spheroid, Vec3, geodetic_to_rectangular};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, require_finite};

/// Body whose surface the observer stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceBody {
    #[default]
    Earth,
    Moon,
}

impl SurfaceBody {
    pub const fn body(self) -> Body {
        match self {
            Self::Earth => Body::Earth,
            Self::Moon => Body::Moon,
        }
    }

    pub const fn frame(self) -> Frame {
        match self {
            Self::Earth => Frame::EarthFixed,
            Self::Moon => Frame::MoonFixed,
        }
    }
}

/// Geodetic site: latitude (deg, north positive), longitude (deg, east
/// positive), altitude (m above the spheroid). Moon sites use
/// selenographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub altitude_m: f64,
    #[serde(default)]
    pub body: SurfaceBody,
}

impl ObserverLocation {
    /// Earth-surface site.
    pub fn new(lat_deg: f64, lon_deg: f64, altitude_m: f64) -> Result<Self, GeometryError> {
        let loc = Self {
            lat_deg,
            lon_deg,
            altitude_m,
            body: SurfaceBody::Earth,
        };
        loc.validate()?;
        Ok(loc)
    }

    /// Moon-surface site.
    pub fn on_moon(lat_deg: f64, lon_deg: f64, altitude_m: f64) -> Result<Self, GeometryError> {
        let loc = Self {
            lat_deg,
            lon_deg,
            altitude_m,
            body: SurfaceBody::Moon,
        };
        loc.validate()?;
        Ok(loc)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let coords = [self.lat_deg, self.lon_deg, self.altitude_m];
        require_finite(&coords, "observer coordinates")?;
        if !(-90.0..=90.0).contains(&self.lat_deg) {
            return Err(GeometryError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.lat_deg
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.lon_deg.to_radians()
    }

    /// Site position in the surface body's body-fixed frame, km.
    pub fn body_fixed_position_km(&self, spheroid: &Spheroid) -> Vec3 {
        geodetic_to_rectangular(
            self.lon_rad(),
            self.lat_rad(),
            self.altitude_m / 1000.0,
            spheroid,
        )
    }

    /// Kernel segment placing this site under `code`.
    pub fn site_segment(
        &self,
        code: i32,
        spheroid: &Spheroid,
    ) -> Result<SiteSegment, GeometryError> {
        Ok(SiteSegment::from_geodetic(
            code,
            self.body.body(),
            self.lat_deg,
            self.lon_deg,
            self.altitude_m,
            spheroid,
        )?)
    }
}
