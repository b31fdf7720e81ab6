//! Truncated ELP-2000/82 lunar theory.
//!
//! Source: Meeus, _Astronomical Algorithms_ (2nd ed.), ch. 47, the largest
//! periodic terms of Tables 47.A and 47.B. Accuracy is roughly 0.01 degree
//! in longitude, 0.005 degree in latitude and a few km in distance,
//! referred to the mean ecliptic and equinox of date.

use crate::EclipticPosition;

/// Mean Earth-Moon distance term of the series, km.
const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Longitude and distance terms.
///
/// Each row: `[D, M, M', F, Σl, Σr]` with Σl in 1e-6 degree and Σr in 1e-3 km.
#[rustfmt::skip]
const LR_TERMS: [[i32; 6]; 32] = [
    [0,  0,  1,  0,  6_288_774, -20_905_355],
    [2,  0, -1,  0,  1_274_027,  -3_699_111],
    [2,  0,  0,  0,    658_314,  -2_955_968],
    [0,  0,  2,  0,    213_618,    -569_925],
    [0,  1,  0,  0,   -185_116,      48_888],
    [0,  0,  0,  2,   -114_332,      -3_149],
    [2,  0, -2,  0,     58_793,     246_158],
    [2, -1, -1,  0,     57_066,    -152_138],
    [2,  0,  1,  0,     53_322,    -170_733],
    [2, -1,  0,  0,     45_758,    -204_586],
    [0,  1, -1,  0,    -40_923,    -129_620],
    [1,  0,  0,  0,    -34_720,     108_743],
    [0,  1,  1,  0,    -30_383,     104_755],
    [2,  0,  0, -2,     15_327,      10_321],
    [0,  0,  1,  2,    -12_528,           0],
    [0,  0,  1, -2,     10_980,      79_661],
    [4,  0, -1,  0,     10_675,     -34_782],
    [0,  0,  3,  0,     10_034,     -23_210],
    [4,  0, -2,  0,      8_548,     -21_636],
    [2,  1, -1,  0,     -7_888,      24_208],
    [2,  1,  0,  0,     -6_766,      30_824],
    [1,  0, -1,  0,     -5_163,      -8_379],
    [1,  1,  0,  0,      4_987,     -16_675],
    [2, -1,  1,  0,      4_036,     -12_831],
    [2,  0,  2,  0,      3_994,     -10_445],
    [4,  0,  0,  0,      3_861,     -11_650],
    [2,  0, -3,  0,      3_665,      14_403],
    [0,  1, -2,  0,     -2_689,      -7_003],
    [2,  0, -1,  2,     -2_602,           0],
    [2, -1, -2,  0,      2_390,      10_056],
    [1,  0,  1,  0,     -2_348,       6_322],
    [2, -2,  0,  0,      2_236,      -9_884],
];

/// Latitude terms.
///
/// Each row: `[D, M, M', F, Σb]` with Σb in 1e-6 degree.
#[rustfmt::skip]
const B_TERMS: [[i32; 5]; 20] = [
    [0,  0,  0,  1,  5_128_122],
    [0,  0,  1,  1,    280_602],
    [0,  0,  1, -1,    277_693],
    [2,  0,  0, -1,    173_237],
    [2,  0, -1,  1,     55_413],
    [2,  0, -1, -1,     46_271],
    [2,  0,  0,  1,     32_573],
    [0,  0,  2,  1,     17_198],
    [2,  0,  1, -1,      9_266],
    [0,  0,  2, -1,      8_822],
    [2, -1,  0, -1,      8_216],
    [2,  0, -2, -1,      4_324],
    [2,  0,  1,  1,      4_200],
    [2,  1,  0, -1,     -3_359],
    [2, -1, -1,  1,      2_463],
    [2, -1,  0,  1,      2_211],
    [2, -1, -1, -1,      2_065],
    [0,  1, -1, -1,     -1_870],
    [4,  0, -1, -1,      1_828],
    [0,  1,  0,  1,     -1_794],
];

/// Fundamental arguments in degrees: `[L', D, M, M', F]`.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn fundamental_arguments_deg(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    // L': mean longitude of the Moon
    let lp = 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    // D: mean elongation of the Moon
    let d = 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    // M: mean anomaly of the Sun
    let m = 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24_490_000.0;
    // M': mean anomaly of the Moon
    let mp = 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    // F: argument of latitude
    let f = 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;

    [lp, d, m, mp, f]
}

/// Geometric geocentric position of the Moon.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn moon_ecliptic(t: f64) -> EclipticPosition {
    let [lp, d, m, mp, f] = fundamental_arguments_deg(t);
    let (lp_r, d_r, m_r, mp_r, f_r) = (
        lp.to_radians(),
        d.to_radians(),
        m.to_radians(),
        mp.to_radians(),
        f.to_radians(),
    );

    // Eccentricity of Earth's orbit scales terms containing M.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;
    let e_factor = |n_m: i32| match n_m.abs() {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };

    // Multiples of D, M, M', F in the first four columns.
    let args = [d_r, m_r, mp_r, f_r];
    let angle = |row: &[i32]| (0..4).map(|i| f64::from(row[i]) * args[i]).sum::<f64>();

    let mut sum_l = 0.0f64;
    let mut sum_r = 0.0f64;
    for row in &LR_TERMS {
        let arg = angle(&row[..4]);
        let k = e_factor(row[1]);
        sum_l += row[4] as f64 * k * arg.sin();
        sum_r += row[5] as f64 * k * arg.cos();
    }

    let mut sum_b = 0.0f64;
    for row in &B_TERMS {
        let arg = angle(&row[..4]);
        sum_b += row[4] as f64 * e_factor(row[1]) * arg.sin();
    }

    // Venus, Jupiter and flattening corrections
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479264.290 * t).to_radians();
    let a3 = (313.45 + 481266.484 * t).to_radians();
    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp_r - f_r).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp_r.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f_r).sin()
        + 175.0 * (a1 + f_r).sin()
        + 127.0 * (lp_r - mp_r).sin()
        - 115.0 * (lp_r + mp_r).sin();

    EclipticPosition {
        lon_deg: (lp + sum_l * 1e-6).rem_euclid(360.0),
        lat_deg: sum_b * 1e-6,
        distance_km: MEAN_DISTANCE_KM + sum_r * 1e-3,
    }
}
