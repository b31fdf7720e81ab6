//! Low-precision geocentric Sun.
//!
//! Source: Meeus, _Astronomical Algorithms_ (2nd ed.), ch. 25. Accuracy
//! about 0.01 degree in longitude, referred to the mean ecliptic and
//! equinox of date.

use crate::EclipticPosition;

/// Astronomical unit in km (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;

/// Geometric geocentric position of the Sun.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn sun_ecliptic(t: f64) -> EclipticPosition {
    let t2 = t * t;

    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t2;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t2).to_radians();
    let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t2;

    // Equation of center
    let c = (1.914602 - 0.004817 * t - 0.000014 * t2) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    let true_lon = l0 + c;
    let true_anomaly = m + c.to_radians();
    let r_au = 1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

    EclipticPosition {
        lon_deg: true_lon.rem_euclid(360.0),
        lat_deg: 0.0,
        distance_km: r_au * AU_KM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_example_25a() {
        // 1992 October 13.0 TD: true longitude 199.90988, R = 0.99766 AU.
        let t = -0.072_183_436;
        let s = sun_ecliptic(t);
        assert!((s.lon_deg - 199.909_88).abs() < 1e-3, "lon = {}", s.lon_deg);
        assert!((s.distance_km / AU_KM - 0.997_66).abs() < 1e-4);
    }

    #[test]
    fn perihelion_and_aphelion_distances() {
        // Early January near perihelion, early July near aphelion.
        let jan = sun_ecliptic((2_460_314.5 - 2_451_545.0) / 36525.0);
        let jul = sun_ecliptic((2_460_495.5 - 2_451_545.0) / 36525.0);
        assert!(jan.distance_km < 0.984 * AU_KM);
        assert!(jul.distance_km > 1.016 * AU_KM);
    }
}
