//! Selenographic coordinates, sub-observer points and Sun data on the Moon.

use luna_core::{Body, EphemerisProvider, Frame};
use luna_frames::{
    Spheroid, Vec3, cartesian_to_latitudinal, norm, normalize_deg_180, rectangular_to_geodetic,
    spheroid_intercept,
};
use luna_time::{Instant, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, require_finite};
use crate::observation::validate_timestamps;

/// Astronomical unit in km.
pub const AU_KM: f64 = 149_597_870.7;

/// Planetocentric coordinates in the Moon-fixed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelenographicCoords {
    /// East longitude, (-180, 180].
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance_km: f64,
}

/// Latitudinal coordinates of a Moon-fixed, Moon-centred vector.
pub fn selenographic_coords(
    moon_fixed_vector: &Vec3,
) -> Result<SelenographicCoords, GeometryError> {
    require_finite(moon_fixed_vector, "moon-fixed vector")?;
    if norm(moon_fixed_vector) == 0.0 {
        return Err(GeometryError::Domain("zero-length moon-fixed vector"));
    }
    let lat = cartesian_to_latitudinal(moon_fixed_vector);
    Ok(SelenographicCoords {
        lon_deg: normalize_deg_180(lat.lon_rad.to_degrees()),
        lat_deg: lat.lat_rad.to_degrees(),
        distance_km: lat.radius_km,
    })
}

/// Sub-observer point on the Moon's reference spheroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubObserverPoint {
    /// Planetographic latitude, [-90, 90].
    pub lat_deg: f64,
    /// Planetographic east longitude, (-180, 180].
    pub lon_deg: f64,
    pub surface_point_km: Vec3,
}

/// Fold a latitude past a pole back into [-90, 90], moving the longitude to
/// the opposite meridian, then wrap the longitude into (-180, 180].
pub fn fold_lat_lon(lat_deg: f64, lon_deg: f64) -> (f64, f64) {
    let (lat, lon) = if lat_deg > 90.0 {
        (180.0 - lat_deg, lon_deg - 180.0)
    } else if lat_deg < -90.0 {
        (-180.0 - lat_deg, lon_deg + 180.0)
    } else {
        (lat_deg, lon_deg)
    };
    (lat, normalize_deg_180(lon))
}

/// Intercept of the Moon-centre to observer line with the spheroid, as
/// planetographic coordinates.
///
/// `moon_to_observer` is in the Moon-fixed frame.
pub fn sub_observer_point(
    moon_to_observer: &Vec3,
    spheroid: &Spheroid,
) -> Result<SubObserverPoint, GeometryError> {
    require_finite(moon_to_observer, "moon-to-observer vector")?;
    let surface = spheroid_intercept(moon_to_observer, spheroid)
        .ok_or(GeometryError::Domain("observer at the Moon's centre"))?;
    let geo = rectangular_to_geodetic(&surface, spheroid);
    let (lat_deg, lon_deg) = fold_lat_lon(geo.lat_rad.to_degrees(), geo.lon_rad.to_degrees());
    Ok(SubObserverPoint {
        lat_deg,
        lon_deg,
        surface_point_km: surface,
    })
}

/// Position of the Sun as seen from the Moon at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonSunData {
    /// Selenographic longitude of the Sun, radians, (-π, π].
    pub lon_sun_rad: f64,
    /// Selenographic latitude of the Sun, radians.
    pub lat_sun_rad: f64,
    pub dist_sun_moon_km: f64,
    pub dist_sun_moon_au: f64,
}

impl MoonSunData {
    pub fn from_moon_fixed(sun_from_moon: &Vec3) -> Result<Self, GeometryError> {
        let s = selenographic_coords(sun_from_moon)?;
        Ok(Self {
            lon_sun_rad: s.lon_deg.to_radians(),
            lat_sun_rad: s.lat_deg.to_radians(),
            dist_sun_moon_km: s.distance_km,
            dist_sun_moon_au: s.distance_km / AU_KM,
        })
    }

    pub fn lon_sun_deg(&self) -> f64 {
        self.lon_sun_rad.to_degrees()
    }
}

/// Sun selenographic coordinates and Sun-Moon distance at `instant`.
pub fn sun_moon_data<P: EphemerisProvider + ?Sized>(
    provider: &P,
    instant: &Instant,
) -> Result<MoonSunData, GeometryError> {
    let sun = provider.position_of(Body::Sun, Body::Moon, Frame::MoonFixed, instant)?;
    MoonSunData::from_moon_fixed(&sun)
}

/// [`sun_moon_data`] at each timestamp, in input order.
///
/// Every timestamp is validated before the provider is queried; one naive
/// timestamp fails the whole batch.
pub fn sun_moon_data_batch<P: EphemerisProvider + ?Sized>(
    provider: &P,
    timestamps: &[Timestamp],
) -> Result<Vec<MoonSunData>, GeometryError> {
    let instants = validate_timestamps(timestamps)?;
    debug!(count = instants.len(), "sun data batch");
    instants
        .iter()
        .map(|(instant, _)| sun_moon_data(provider, instant))
        .collect()
}
