//! Lunation checks against published 2024 phase times.

use chrono::{TimeZone, Utc};
use luna_core::{Body, EphemerisProvider, Frame};
use luna_ephem::{AnalyticEphemeris, moon_ecliptic, sun_ecliptic};
use luna_frames::angle_between_rad;
use luna_time::Instant;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Instant {
    Instant::from_utc(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
}

fn elongation_deg(instant: &Instant) -> f64 {
    let e = AnalyticEphemeris::new();
    let geocentric = |body: Body| e.position_of(body, Body::Earth, Frame::Inertial, instant);
    let moon = geocentric(Body::Moon).unwrap();
    let sun = geocentric(Body::Sun).unwrap();
    angle_between_rad(&moon, &sun).unwrap().to_degrees()
}

fn longitude_difference_deg(instant: &Instant) -> f64 {
    let t = instant.centuries_since_j2000_tt();
    (moon_ecliptic(t).lon_deg - sun_ecliptic(t).lon_deg).rem_euclid(360.0)
}

#[test]
fn full_moon_2024_01_25() {
    let t = at(2024, 1, 25, 17, 54);
    assert!((longitude_difference_deg(&t) - 180.0).abs() < 0.3);
    assert!(elongation_deg(&t) > 174.0);
}

#[test]
fn new_moon_2024_02_09() {
    let t = at(2024, 2, 9, 22, 59);
    let d = longitude_difference_deg(&t);
    assert!(d < 0.3 || d > 359.7, "Δλ = {d}");
    assert!(elongation_deg(&t) < 6.0);
}

#[test]
fn first_quarter_2024_01_18() {
    let t = at(2024, 1, 18, 3, 53);
    assert!((longitude_difference_deg(&t) - 90.0).abs() < 0.3);
}

#[test]
fn elongation_grows_through_waxing_half() {
    let mut prev = elongation_deg(&at(2024, 1, 12, 0, 0));
    for day in 13..25 {
        let e = elongation_deg(&at(2024, 1, day, 0, 0));
        assert!(e > prev, "day {day}: {e} <= {prev}");
        prev = e;
    }
}
