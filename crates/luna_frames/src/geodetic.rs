//! Geodetic (planetographic) coordinates on a biaxial spheroid.
//!
//! Latitudes here are geodetic: the angle between the equatorial plane and
//! the surface normal. Longitudes are east-positive, which is the
//! planetographic convention for both the Earth and the Moon.

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;

/// Maximum iterations of the geodetic latitude refinement.
const MAX_ITERATIONS: usize = 20;

/// Latitude convergence threshold in radians (~0.02 mas).
const CONVERGENCE_RAD: f64 = 1e-13;

/// Biaxial (oblate) spheroid, radii in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spheroid {
    pub equatorial_radius_km: f64,
    pub polar_radius_km: f64,
}

impl Spheroid {
    /// Earth radii used for ground sites (IERS 2003 / ITRF).
    pub const EARTH: Spheroid = Spheroid {
        equatorial_radius_km: 6378.1366,
        polar_radius_km: 6356.7519,
    };

    /// Moon radii. The kernel-supplied radii are a sphere of 1737.4 km, which
    /// is too coarse for sub-observer latitudes.
    pub const MOON: Spheroid = Spheroid {
        equatorial_radius_km: 1738.1,
        polar_radius_km: 1736.0,
    };

    pub fn new(equatorial_radius_km: f64, polar_radius_km: f64) -> Self {
        Self {
            equatorial_radius_km,
            polar_radius_km,
        }
    }

    /// `(a - c) / a`.
    pub fn flattening(&self) -> f64 {
        (self.equatorial_radius_km - self.polar_radius_km) / self.equatorial_radius_km
    }

    /// First eccentricity squared, `f (2 - f)`.
    pub fn eccentricity_sq(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Whether both radii are finite, positive and `polar <= equatorial`.
    pub fn is_valid(&self) -> bool {
        self.equatorial_radius_km.is_finite()
            && self.polar_radius_km.is_finite()
            && self.polar_radius_km > 0.0
            && self.polar_radius_km <= self.equatorial_radius_km
    }
}

/// Geodetic coordinates: longitude and latitude in radians, altitude in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticCoords {
    pub lon_rad: f64,
    pub lat_rad: f64,
    pub alt_km: f64,
}

/// Geodetic → body-fixed rectangular `[x, y, z]` in km.
pub fn geodetic_to_rectangular(
    lon_rad: f64,
    lat_rad: f64,
    alt_km: f64,
    spheroid: &Spheroid,
) -> Vec3 {
    let a = spheroid.equatorial_radius_km;
    let e2 = spheroid.eccentricity_sq();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    [
        (n + alt_km) * cos_lat * cos_lon,
        (n + alt_km) * cos_lat * sin_lon,
        (n * (1.0 - e2) + alt_km) * sin_lat,
    ]
}

/// Body-fixed rectangular `[x, y, z]` (km) → geodetic coordinates.
///
/// Fixed-point iteration on the latitude; converges in a handful of steps
/// for any point outside the spheroid's focal disc.
pub fn rectangular_to_geodetic(xyz: &Vec3, spheroid: &Spheroid) -> GeodeticCoords {
    let (x, y, z) = (xyz[0], xyz[1], xyz[2]);
    let a = spheroid.equatorial_radius_km;
    let c = spheroid.polar_radius_km;
    let e2 = spheroid.eccentricity_sq();
    let p = x.hypot(y);
    let lon = if p == 0.0 { 0.0 } else { y.atan2(x) };

    if p == 0.0 {
        let lat = if z >= 0.0 {
            std::f64::consts::FRAC_PI_2
        } else {
            -std::f64::consts::FRAC_PI_2
        };
        return GeodeticCoords {
            lon_rad: lon,
            lat_rad: lat,
            alt_km: z.abs() - c,
        };
    }

    let mut lat = z.atan2(p * (1.0 - e2));
    let mut alt = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        alt = if lat.cos().abs() > 1e-9 {
            p / lat.cos() - n
        } else {
            z / sin_lat - n * (1.0 - e2)
        };
        let next = z.atan2(p * (1.0 - e2 * n / (n + alt)));
        let done = (next - lat).abs() < CONVERGENCE_RAD;
        lat = next;
        if done {
            break;
        }
    }

    GeodeticCoords {
        lon_rad: lon,
        lat_rad: lat,
        alt_km: alt,
    }
}

/// Point where the ray from the spheroid centre along `direction` pierces
/// the surface. `None` for a zero-length direction.
pub fn spheroid_intercept(direction: &Vec3, spheroid: &Spheroid) -> Option<Vec3> {
    let a = spheroid.equatorial_radius_km;
    let c = spheroid.polar_radius_km;
    let (x, y, z) = (direction[0], direction[1], direction[2]);
    let q = (x * x + y * y) / (a * a) + z * z / (c * c);
    if !q.is_finite() || q <= 0.0 {
        return None;
    }
    let t = 1.0 / q.sqrt();
    Some([x * t, y * t, z * t])
}

/// Geodetic latitude (radians) of a point lying on the spheroid surface.
///
/// On the surface the normal is parallel to `(x/a², y/a², z/c²)`, so no
/// iteration is needed.
pub fn surface_point_latitude(point: &Vec3, spheroid: &Spheroid) -> f64 {
    let a2 = spheroid.equatorial_radius_km * spheroid.equatorial_radius_km;
    let c2 = spheroid.polar_radius_km * spheroid.polar_radius_km;
    let rho = point[0].hypot(point[1]);
    (point[2] / c2).atan2(rho / a2)
}
