//! Frame orientation models.
//!
//! Each function returns the matrix taking inertial (J2000 mean equator)
//! vectors into the named frame.
//!
//! - Precession: Lieske et al. 1977 (IAU 1976) equatorial angles ζ, z, θ.
//! - Earth-fixed: GMST about the precessed pole. Nutation and polar motion
//!   are ignored (< 20 arcsec).
//! - Moon-fixed: IAU WGCCRE 2009 lunar pole and prime meridian.

use luna_frames::{Mat3, Vec3, mtxv, mxm, mxv, rot_x, rot_y, rot_z};
use luna_time::{Instant, gmst_rad};

use crate::EclipticPosition;

/// Arcseconds to degrees.
const AS2DEG: f64 = 1.0 / 3600.0;

/// Mean obliquity of the ecliptic in degrees.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Precession matrix from J2000 mean equator to mean equator of date.
pub fn precession_matrix(t: f64) -> Mat3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * AS2DEG;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * AS2DEG;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * AS2DEG;

    let m = mxm(&rot_y(theta.to_radians()), &rot_z(-zeta.to_radians()));
    mxm(&rot_z(-z.to_radians()), &m)
}

/// Convert an ecliptic-of-date position to a J2000 equatorial vector.
pub fn ecliptic_of_date_to_inertial(p: &EclipticPosition, t: f64) -> Vec3 {
    let (sl, cl) = p.lon_deg.to_radians().sin_cos();
    let (sb, cb) = p.lat_deg.to_radians().sin_cos();
    let r = p.distance_km;
    let ecl = [r * cb * cl, r * cb * sl, r * sb];

    let eps = mean_obliquity_deg(t).to_radians();
    let equ_of_date = mxv(&rot_x(-eps), &ecl);
    mtxv(&precession_matrix(t), &equ_of_date)
}

/// Inertial to Earth-fixed rotation.
pub fn earth_fixed_matrix(instant: &Instant) -> Mat3 {
    let t = instant.centuries_since_j2000_tt();
    let gmst = gmst_rad(instant.jd_utc());
    mxm(&rot_z(gmst), &precession_matrix(t))
}

/// IAU lunar pole right ascension, declination and prime meridian, degrees.
///
/// `d` = days of TT since J2000.0.
pub fn moon_pole_and_meridian_deg(d: f64) -> (f64, f64, f64) {
    let t = d / 36525.0;
    let e = |c0: f64, rate: f64| (c0 + rate * d).to_radians();
    let e1 = e(125.045, -0.052_992_1);
    let e2 = e(250.089, -0.105_984_2);
    let e3 = e(260.008, 13.012_000_9);
    let e4 = e(176.625, 13.340_715_4);
    let e5 = e(357.529, 0.985_600_3);
    let e6 = e(311.589, 26.405_708_4);
    let e7 = e(134.963, 13.064_993_0);
    let e8 = e(276.617, 0.328_714_6);
    let e9 = e(34.226, 1.748_487_7);
    let e10 = e(15.134, -0.158_976_3);
    let e11 = e(119.743, 0.003_609_6);
    let e12 = e(239.961, 0.164_357_3);
    let e13 = e(25.053, 12.959_008_8);

    let alpha0 = 269.9949 + 0.0031 * t - 3.8787 * e1.sin() - 0.1204 * e2.sin()
        + 0.0700 * e3.sin()
        - 0.0172 * e4.sin()
        + 0.0072 * e6.sin()
        - 0.0052 * e10.sin()
        + 0.0043 * e13.sin();

    let delta0 = 66.5392 + 0.0130 * t + 1.5419 * e1.cos() + 0.0239 * e2.cos()
        - 0.0278 * e3.cos()
        + 0.0068 * e4.cos()
        - 0.0029 * e6.cos()
        + 0.0009 * e7.cos()
        + 0.0008 * e10.cos()
        - 0.0009 * e13.cos();

    let w = 38.3213 + 13.176_358_15 * d - 1.4e-12 * d * d + 3.5610 * e1.sin()
        + 0.1208 * e2.sin()
        - 0.0642 * e3.sin()
        + 0.0158 * e4.sin()
        + 0.0252 * e5.sin()
        - 0.0066 * e6.sin()
        - 0.0047 * e7.sin()
        - 0.0046 * e8.sin()
        + 0.0028 * e9.sin()
        + 0.0052 * e10.sin()
        + 0.0040 * e11.sin()
        + 0.0019 * e12.sin()
        - 0.0044 * e13.sin();

    (alpha0, delta0, w.rem_euclid(360.0))
}

/// Inertial to Moon-fixed rotation.
pub fn moon_fixed_matrix(instant: &Instant) -> Mat3 {
    let (alpha0, delta0, w) = moon_pole_and_meridian_deg(instant.days_since_j2000_tt());
    let m = mxm(
        &rot_x((90.0 - delta0).to_radians()),
        &rot_z((90.0 + alpha0).to_radians()),
    );
    mxm(&rot_z(w.to_radians()), &m)
}
