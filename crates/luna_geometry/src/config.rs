//! Observation configuration.

use luna_core::Body;
use luna_frames::Spheroid;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::location::SurfaceBody;

/// Site code given to Earth-surface observers in a [`luna_core::KernelSet`].
pub const DEFAULT_EARTH_SITE_CODE: i32 = 399_100;

/// Site code given to Moon-surface observers in a [`luna_core::KernelSet`].
pub const DEFAULT_MOON_SITE_CODE: i32 = 301_100;

/// Which reduction produces zenith and azimuth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZenithPath {
    /// Closed-form projection onto the local up/north/east basis.
    #[default]
    Direct,
    /// Observer registered as a kernel site, then rotated into the local
    /// south/east/up frame.
    Kernel,
}

/// Knobs for [`crate::observe`] and [`crate::observe_batch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    pub zenith_path: ZenithPath,
    /// Measure zenith/azimuth of the Moon from the Earth's centre along the
    /// site's local vertical instead of from the site itself.
    pub earth_as_zenith_observer: bool,
    pub earth_spheroid: Spheroid,
    pub moon_spheroid: Spheroid,
    pub earth_site_code: i32,
    pub moon_site_code: i32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            zenith_path: ZenithPath::default(),
            earth_as_zenith_observer: false,
            earth_spheroid: Spheroid::EARTH,
            moon_spheroid: Spheroid::MOON,
            earth_site_code: DEFAULT_EARTH_SITE_CODE,
            moon_site_code: DEFAULT_MOON_SITE_CODE,
        }
    }
}

impl ObservationConfig {
    pub fn with_zenith_path(mut self, path: ZenithPath) -> Self {
        self.zenith_path = path;
        self
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.earth_spheroid.is_valid() {
            return Err(GeometryError::InvalidInput(
                "earth_spheroid radii must be positive with polar <= equatorial".into(),
            ));
        }
        if !self.moon_spheroid.is_valid() {
            return Err(GeometryError::InvalidInput(
                "moon_spheroid radii must be positive with polar <= equatorial".into(),
            ));
        }
        for code in [self.earth_site_code, self.moon_site_code] {
            if !Body::from_code(code).is_site() {
                return Err(GeometryError::InvalidInput(format!(
                    "site code {code} collides with a natural body"
                )));
            }
        }
        if self.earth_site_code == self.moon_site_code {
            return Err(GeometryError::InvalidInput(
                "earth_site_code and moon_site_code must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn spheroid(&self, body: SurfaceBody) -> &Spheroid {
        match body {
            SurfaceBody::Earth => &self.earth_spheroid,
            SurfaceBody::Moon => &self.moon_spheroid,
        }
    }

    pub fn site_code(&self, body: SurfaceBody) -> i32 {
        match body {
            SurfaceBody::Earth => self.earth_site_code,
            SurfaceBody::Moon => self.moon_site_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let c = ObservationConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.zenith_path, ZenithPath::Direct);
        assert_eq!(c.site_code(SurfaceBody::Moon), 301_100);
    }

    #[test]
    fn bad_spheroid_rejected() {
        let c = ObservationConfig {
            moon_spheroid: Spheroid::new(1736.0, 1738.1),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(GeometryError::InvalidInput(_))));
    }

    #[test]
    fn natural_body_site_code_rejected() {
        let c = ObservationConfig {
            earth_site_code: 399,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn equal_site_codes_rejected() {
        let c = ObservationConfig {
            moon_site_code: DEFAULT_EARTH_SITE_CODE,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }
}
