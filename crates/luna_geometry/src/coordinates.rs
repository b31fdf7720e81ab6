//! Geodetic ⇄ rectangular conversions for lists of points, in metres.

use luna_core::{Body, EphemerisProvider, Frame};
use luna_frames::{
    Spheroid, Vec3, geodetic_to_rectangular, mxv, normalize_deg_180, rectangular_to_geodetic,
    scale, sub,
};
use luna_time::{Instant, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, require_finite};

/// Latitude and longitude in degrees, height in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonHeight {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub height_m: f64,
}

impl LatLonHeight {
    pub fn new(lat_deg: f64, lon_deg: f64, height_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            height_m,
        }
    }
}

fn check_spheroid(spheroid: &Spheroid) -> Result<(), GeometryError> {
    if spheroid.is_valid() {
        Ok(())
    } else {
        Err(GeometryError::InvalidInput("invalid spheroid radii".into()))
    }
}

fn llh_to_km(p: &LatLonHeight, spheroid: &Spheroid) -> Result<Vec3, GeometryError> {
    require_finite(&[p.lat_deg, p.lon_deg, p.height_m], "geodetic point")?;
    Ok(geodetic_to_rectangular(
        p.lon_deg.to_radians(),
        p.lat_deg.to_radians(),
        p.height_m / 1000.0,
        spheroid,
    ))
}

fn km_to_llh(xyz_km: &Vec3, spheroid: &Spheroid) -> LatLonHeight {
    let g = rectangular_to_geodetic(xyz_km, spheroid);
    LatLonHeight {
        lat_deg: g.lat_rad.to_degrees(),
        lon_deg: normalize_deg_180(g.lon_rad.to_degrees()),
        height_m: g.alt_km * 1000.0,
    }
}

/// Geodetic points to body-fixed rectangular coordinates (m).
pub fn to_rectangular(
    points: &[LatLonHeight],
    spheroid: &Spheroid,
) -> Result<Vec<Vec3>, GeometryError> {
    check_spheroid(spheroid)?;
    points
        .iter()
        .map(|p| llh_to_km(p, spheroid).map(|v| scale(&v, 1000.0)))
        .collect()
}

/// Body-fixed rectangular coordinates (m) to geodetic points.
pub fn to_planetographic(
    xyz_m: &[Vec3],
    spheroid: &Spheroid,
) -> Result<Vec<LatLonHeight>, GeometryError> {
    check_spheroid(spheroid)?;
    xyz_m
        .iter()
        .map(|v| -> Result<LatLonHeight, GeometryError> {
            require_finite(v, "rectangular point")?;
            Ok(km_to_llh(&scale(v, 1e-3), spheroid))
        })
        .collect()
}

/// Move a vector (km) from `source` to `target` at `instant`. Targets in the
/// Moon-fixed frame are re-centred on the Moon unless the source frame is
/// already Moon-fixed.
fn change_frames<P: EphemerisProvider + ?Sized>(
    provider: &P,
    v_km: &Vec3,
    source: Frame,
    target: Frame,
    instant: &Instant,
) -> Result<Vec3, GeometryError> {
    let rot = provider.rotation(source, target, instant)?;
    if target != Frame::MoonFixed || source == Frame::MoonFixed {
        return Ok(mxv(&rot, v_km));
    }
    let moon = provider.position_of(Body::Moon, Body::Earth, source, instant)?;
    Ok(mxv(&rot, &sub(v_km, &moon)))
}

fn paired_instants(len: usize, timestamps: &[Timestamp]) -> Result<Vec<Instant>, GeometryError> {
    if len != timestamps.len() {
        return Err(GeometryError::InvalidInput(format!(
            "{len} points for {} timestamps",
            timestamps.len()
        )));
    }
    timestamps
        .iter()
        .map(|ts| Instant::try_from(ts).map_err(GeometryError::from))
        .collect()
}

/// Geodetic points on `spheroid` in `source_frame`, each moved to
/// `target_frame` at its own timestamp. Output in metres.
pub fn to_rectangular_multiple<P: EphemerisProvider + ?Sized>(
    provider: &P,
    points: &[LatLonHeight],
    spheroid: &Spheroid,
    timestamps: &[Timestamp],
    source_frame: Frame,
    target_frame: Frame,
) -> Result<Vec<Vec3>, GeometryError> {
    check_spheroid(spheroid)?;
    let instants = paired_instants(points.len(), timestamps)?;
    points
        .iter()
        .zip(&instants)
        .map(|(p, instant)| -> Result<Vec3, GeometryError> {
            let km = llh_to_km(p, spheroid)?;
            let moved = change_frames(provider, &km, source_frame, target_frame, instant)?;
            Ok(scale(&moved, 1000.0))
        })
        .collect()
}

/// Rectangular points (m) in `source_frame`, each moved to `target_frame`
/// at its own timestamp and converted to geodetic coordinates on `spheroid`.
pub fn to_planetographic_multiple<P: EphemerisProvider + ?Sized>(
    provider: &P,
    xyz_m: &[Vec3],
    spheroid: &Spheroid,
    timestamps: &[Timestamp],
    source_frame: Frame,
    target_frame: Frame,
) -> Result<Vec<LatLonHeight>, GeometryError> {
    check_spheroid(spheroid)?;
    let instants = paired_instants(xyz_m.len(), timestamps)?;
    xyz_m
        .iter()
        .zip(&instants)
        .map(|(v, instant)| -> Result<LatLonHeight, GeometryError> {
            require_finite(v, "rectangular point")?;
            let km = scale(v, 1e-3);
            let moved = change_frames(provider, &km, source_frame, target_frame, instant)?;
            Ok(km_to_llh(&moved, spheroid))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use luna_core::{AdapterError, Query};
    use luna_frames::{IDENTITY, Mat3, mxm, rot_z, transpose};

    /// Moon on +x; Earth-fixed is inertial turned 90° about z; Moon-fixed
    /// equals inertial.
    struct Turned;

    impl EphemerisProvider for Turned {
        fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
            let at = |b: Body| match b {
                Body::Moon => [384_400.0, 0.0, 0.0],
                _ => [0.0; 3],
            };
            let v = sub(&at(query.target), &at(query.center));
            Ok(mxv(&self.rotation(Frame::Inertial, query.frame, instant)?, &v))
        }

        fn rotation(&self, from: Frame, to: Frame, _: &Instant) -> Result<Mat3, AdapterError> {
            let m = |f: Frame| match f {
                Frame::EarthFixed => rot_z(std::f64::consts::FRAC_PI_2),
                _ => IDENTITY,
            };
            Ok(mxm(&m(to), &transpose(&m(from))))
        }
    }

    #[test]
    fn same_frame_roundtrip_in_metres() {
        let pts = [
            LatLonHeight::new(28.309283, -16.499143, 2400.0),
            LatLonHeight::new(-45.0, 170.0, -30.0),
        ];
        let xyz = to_rectangular(&pts, &Spheroid::EARTH).unwrap();
        assert!(xyz[0][0] > 5.0e6);
        let back = to_planetographic(&xyz, &Spheroid::EARTH).unwrap();
        for (a, b) in pts.iter().zip(&back) {
            assert!((a.lat_deg - b.lat_deg).abs() < 1e-9);
            assert!((a.lon_deg - b.lon_deg).abs() < 1e-9);
            assert!((a.height_m - b.height_m).abs() < 1e-5);
        }
    }

    #[test]
    fn longitudes_folded() {
        let xyz = to_rectangular(&[LatLonHeight::new(0.0, 270.0, 0.0)], &Spheroid::MOON).unwrap();
        let back = to_planetographic(&xyz, &Spheroid::MOON).unwrap();
        assert!((back[0].lon_deg + 90.0).abs() < 1e-9);
    }

    #[test]
    fn multiple_changes_frame_per_instant() {
        let ts: Vec<Timestamp> = vec!["2024-01-25 00:00:00".into()];
        let pts = [LatLonHeight::new(0.0, 0.0, 0.0)];
        let out = to_rectangular_multiple(
            &Turned,
            &pts,
            &Spheroid::EARTH,
            &ts,
            Frame::EarthFixed,
            Frame::Inertial,
        )
        .unwrap();
        // Earth-fixed +x is inertial +y.
        assert!(out[0][0].abs() < 1e-6);
        assert!((out[0][1] - 6_378_136.6).abs() < 1e-3);
    }

    #[test]
    fn moon_target_is_recentred() {
        let ts: Vec<Timestamp> = vec!["2024-01-25 00:00:00".into()];
        // A point 1000 km beyond the Moon's centre on +x.
        let xyz = [[385_400_000.0, 0.0, 0.0]];
        let out = to_planetographic_multiple(
            &Turned,
            &xyz,
            &Spheroid::MOON,
            &ts,
            Frame::Inertial,
            Frame::MoonFixed,
        )
        .unwrap();
        assert!(out[0].lat_deg.abs() < 1e-9 && out[0].lon_deg.abs() < 1e-9);
        assert!((out[0].height_m - (1000.0 - 1738.1) * 1000.0).abs() < 1e-3);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = to_rectangular_multiple(
            &Turned,
            &[LatLonHeight::new(0.0, 0.0, 0.0)],
            &Spheroid::EARTH,
            &[],
            Frame::EarthFixed,
            Frame::Inertial,
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidInput(_)));
    }
}
