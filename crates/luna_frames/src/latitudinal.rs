//! Cartesian to latitudinal conversion and angle folding.

use crate::vector::Vec3;

/// Latitudinal coordinates in radians with longitude in (-π, π].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudinalCoords {
    pub radius_km: f64,
    pub lon_rad: f64,
    pub lat_rad: f64,
}

/// Convert Cartesian `[x, y, z]` to latitudinal coordinates.
///
/// Longitude is measured in the x-y plane from +x toward +y, latitude is
/// the elevation above that plane. The zero vector maps to all-zero
/// coordinates.
pub fn cartesian_to_latitudinal(xyz: &Vec3) -> LatitudinalCoords {
    let (x, y, z) = (xyz[0], xyz[1], xyz[2]);
    let rxy = x.hypot(y);
    let r = rxy.hypot(z);

    if r == 0.0 {
        return LatitudinalCoords {
            radius_km: 0.0,
            lon_rad: 0.0,
            lat_rad: 0.0,
        };
    }

    let lon = if x == 0.0 && y == 0.0 { 0.0 } else { y.atan2(x) };
    LatitudinalCoords {
        radius_km: r,
        lon_rad: lon,
        lat_rad: z.atan2(rxy),
    }
}

/// Fold an angle in degrees into [0, 360).
pub fn normalize_deg_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Fold an angle in degrees into (-180, 180].
pub fn normalize_deg_180(deg: f64) -> f64 {
    let r = normalize_deg_360(deg);
    if r > 180.0 { r - 360.0 } else { r }
}
