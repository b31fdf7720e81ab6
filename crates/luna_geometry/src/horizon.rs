//! Zenith and azimuth of a target as seen from a surface site.
//!
//! Two reductions produce the same numbers:
//!
//! - [`compute_zenith_azimuth`] projects the site-to-target vector onto the
//!   local up/north/east basis built from the geodetic normal.
//! - [`compute_zenith_azimuth_rotated`] rotates the vector into the local
//!   south/east/up frame with a z-y Euler rotation, then reads zenith and
//!   azimuth off its latitudinal coordinates.
//!
//! [`zenith_azimuth_direct`] and [`zenith_azimuth_via_kernel`] feed them
//! from an ephemeris provider. The first builds the site vector itself; the
//! second asks a [`KernelSet`] for the Moon relative to a registered site.

use luna_core::{Body, EphemerisProvider, KernelSet};
use luna_frames::{
    Vec3, cartesian_to_latitudinal, dot, mxm, mxv, norm, normalize_deg_360, rot_y, rot_z, sub,
};
use luna_time::Instant;
use serde::{Deserialize, Serialize};

use crate::config::ObservationConfig;
use crate::error::{GeometryError, require_finite};
use crate::location::{ObserverLocation, SurfaceBody};

/// Vectors shorter than this (km) have no direction.
const MIN_RANGE_KM: f64 = 1e-9;

/// Topocentric direction to a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoords {
    /// Angle from the local vertical, [0, 180].
    pub zenith_deg: f64,
    /// Bearing from north through east, [0, 360).
    pub azimuth_deg: f64,
}

impl HorizontalCoords {
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.zenith_deg
    }
}

/// Local up, north and east unit vectors in the body-fixed frame.
fn local_basis(location: &ObserverLocation) -> (Vec3, Vec3, Vec3) {
    let (sl, cl) = location.lon_rad().sin_cos();
    let (sp, cp) = location.lat_rad().sin_cos();
    let up = [cp * cl, cp * sl, sp];
    let north = [-sp * cl, -sp * sl, cp];
    let east = [-sl, cl, 0.0];
    (up, north, east)
}

fn check_range(v: &Vec3) -> Result<(), GeometryError> {
    require_finite(v, "position vector")?;
    if norm(v) < MIN_RANGE_KM {
        return Err(GeometryError::Domain("observer and target coincide"));
    }
    Ok(())
}

/// Closed-form zenith/azimuth of `target_vector` seen from `observer_vector`.
///
/// Both vectors are in the body-fixed frame of the location's surface body.
pub fn compute_zenith_azimuth(
    location: &ObserverLocation,
    observer_vector: &Vec3,
    target_vector: &Vec3,
) -> Result<HorizontalCoords, GeometryError> {
    location.validate()?;
    require_finite(observer_vector, "observer vector")?;
    let rel = sub(target_vector, observer_vector);
    check_range(&rel)?;

    let (up, north, east) = local_basis(location);
    let u = dot(&rel, &up);
    let n = dot(&rel, &north);
    let e = dot(&rel, &east);

    let zenith = n.hypot(e).atan2(u).to_degrees();
    let azimuth = normalize_deg_360(e.atan2(n).to_degrees());
    Ok(HorizontalCoords {
        zenith_deg: zenith,
        azimuth_deg: azimuth,
    })
}

/// Zenith/azimuth from a site-relative vector via the south/east/up frame.
///
/// `relative_vector` is target minus site in the body-fixed frame.
pub fn compute_zenith_azimuth_rotated(
    location: &ObserverLocation,
    relative_vector: &Vec3,
) -> Result<HorizontalCoords, GeometryError> {
    location.validate()?;
    check_range(relative_vector)?;

    let colat = (90.0 - location.lat_deg).to_radians();
    let body_to_sez = mxm(&rot_y(colat), &rot_z(location.lon_rad()));
    let sez = mxv(&body_to_sez, relative_vector);
    let lat = cartesian_to_latitudinal(&sez);

    Ok(HorizontalCoords {
        zenith_deg: 90.0 - lat.lat_rad.to_degrees(),
        azimuth_deg: normalize_deg_360(180.0 - lat.lon_rad.to_degrees()),
    })
}

/// Moon position relative to the centre of the location's surface body, in
/// that body's fixed frame. A Moon-surface site sees the Moon's centre.
fn moon_from_surface_body<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: SurfaceBody,
    instant: &Instant,
) -> Result<Vec3, GeometryError> {
    match body {
        SurfaceBody::Moon => Ok([0.0; 3]),
        SurfaceBody::Earth => {
            let moon = provider.position_of(Body::Moon, Body::Earth, body.frame(), instant)?;
            Ok(moon)
        }
    }
}

fn check_zenith_observer(
    location: &ObserverLocation,
    config: &ObservationConfig,
) -> Result<(), GeometryError> {
    if config.earth_as_zenith_observer && location.body != SurfaceBody::Earth {
        return Err(GeometryError::InvalidInput(
            "earth_as_zenith_observer requires an Earth-surface location".into(),
        ));
    }
    Ok(())
}

/// Moon zenith/azimuth without a kernel: geodetic site vector subtracted
/// from the body-fixed Moon vector, then [`compute_zenith_azimuth`].
pub fn zenith_azimuth_direct<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    instant: &Instant,
    config: &ObservationConfig,
) -> Result<HorizontalCoords, GeometryError> {
    location.validate()?;
    check_zenith_observer(location, config)?;

    let moon = moon_from_surface_body(provider, location.body, instant)?;
    let observer = if config.earth_as_zenith_observer {
        [0.0; 3]
    } else {
        location.body_fixed_position_km(config.spheroid(location.body))
    };
    compute_zenith_azimuth(location, &observer, &moon)
}

/// Moon zenith/azimuth through a kernel set where the location is registered
/// as site `site_code`.
pub fn zenith_azimuth_via_kernel<P: EphemerisProvider>(
    kernels: &KernelSet<P>,
    site_code: i32,
    location: &ObserverLocation,
    instant: &Instant,
    config: &ObservationConfig,
) -> Result<HorizontalCoords, GeometryError> {
    location.validate()?;
    check_zenith_observer(location, config)?;

    let observer = if config.earth_as_zenith_observer {
        Body::Earth
    } else {
        Body::Site(site_code)
    };
    let rel = kernels.position_of(Body::Moon, observer, location.body.frame(), instant)?;
    compute_zenith_azimuth_rotated(location, &rel)
}
