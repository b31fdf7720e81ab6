//! Plain `[f64; 3]` vector algebra.

/// Cartesian 3-vector, km unless stated otherwise.
pub type Vec3 = [f64; 3];

/// Norms below this are treated as zero-length.
const TINY: f64 = 1e-30;

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// `a - b`.
pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: &Vec3, k: f64) -> Vec3 {
    [v[0] * k, v[1] * k, v[2] * k]
}

/// Unit vector along `v`, or `None` for a zero-length or non-finite vector.
pub fn unit(v: &Vec3) -> Option<Vec3> {
    let n = norm(v);
    if !n.is_finite() || n < TINY {
        return None;
    }
    Some(scale(v, 1.0 / n))
}

/// Angle between two vectors in radians, range [0, π].
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate near 0 and π where
/// `acos` loses precision. Returns `None` if either vector is degenerate.
pub fn angle_between_rad(a: &Vec3, b: &Vec3) -> Option<f64> {
    let na = norm(a);
    let nb = norm(b);
    if !na.is_finite() || !nb.is_finite() || na < TINY || nb < TINY {
        return None;
    }
    Some(norm(&cross(a, b)).atan2(dot(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    #[test]
    fn cross_of_axes() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross(&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn unit_rejects_zero() {
        assert!(unit(&[0.0, 0.0, 0.0]).is_none());
        assert!(unit(&[f64::NAN, 1.0, 0.0]).is_none());
    }

    #[test]
    fn unit_has_length_one() {
        let u = unit(&[3.0, -4.0, 12.0]).unwrap();
        assert!((norm(&u) - 1.0).abs() < EPS);
    }

    #[test]
    fn angle_between_orthogonal_and_opposite() {
        let a = angle_between_rad(&[2.0, 0.0, 0.0], &[0.0, 5.0, 0.0]).unwrap();
        assert!((a - FRAC_PI_2).abs() < EPS);
        let b = angle_between_rad(&[1.0, 1.0, 0.0], &[-3.0, -3.0, 0.0]).unwrap();
        assert!((b - PI).abs() < EPS);
    }

    #[test]
    fn angle_between_tiny_separation() {
        // 1 arcsecond apart at lunar distance
        let d = 384_400.0;
        let eps = (1.0_f64 / 3600.0).to_radians();
        let a = angle_between_rad(&[d, 0.0, 0.0], &[d * eps.cos(), d * eps.sin(), 0.0]).unwrap();
        assert!((a - eps).abs() < 1e-15);
    }

    #[test]
    fn angle_between_degenerate() {
        assert!(angle_between_rad(&[0.0; 3], &[1.0, 0.0, 0.0]).is_none());
    }
}
