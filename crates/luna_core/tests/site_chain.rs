//! Site chains and shared providers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use luna_core::{AdapterError, Body, EphemerisProvider, Frame, KernelSet, Query, SiteSegment};
use luna_frames::{IDENTITY, Mat3, Vec3, mxm, mxv, rot_z, sub, transpose};
use luna_time::Instant;

/// Earth at origin, Moon on +x. Earth-fixed is inertial rotated by a
/// quarter turn per day about z. Counts natural queries.
#[derive(Default)]
struct Spinning {
    queries: AtomicUsize,
}

impl Spinning {
    fn earth_fixed(instant: &Instant) -> Mat3 {
        let turns = instant.days_since_j2000_tt() * 0.25;
        rot_z(turns.fract() * std::f64::consts::TAU)
    }
}

impl EphemerisProvider for Spinning {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        query.validate()?;
        self.queries.fetch_add(1, Ordering::SeqCst);
        let at = |b: Body| match b {
            Body::Earth => Ok([0.0; 3]),
            Body::Moon => Ok([384_400.0, 0.0, 0.0]),
            Body::Sun => Ok([-1.496e8, 0.0, 0.0]),
            Body::Site(c) => Err(AdapterError::UnsupportedBody(c)),
        };
        let v = sub(&at(query.target)?, &at(query.center)?);
        Ok(mxv(&self.rotation(Frame::Inertial, query.frame, instant)?, &v))
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        let m = |f: Frame| match f {
            Frame::EarthFixed => Self::earth_fixed(instant),
            _ => IDENTITY,
        };
        Ok(mxm(&m(to), &transpose(&m(from))))
    }
}

fn t(hour: u32) -> Instant {
    Instant::from_utc_ymd_hms(2024, 1, 25, hour, 0, 0).unwrap()
}

fn earth_site(code: i32, position_km: Vec3) -> SiteSegment {
    SiteSegment::new(code, Body::Earth, Frame::EarthFixed, position_km).unwrap()
}

#[test]
fn nested_sites_accumulate_offsets() {
    let mut ks = KernelSet::new(Spinning::default());
    let pier = earth_site(399_100, [6378.0, 0.0, 0.0]);
    let offset = [0.0, 0.0, 0.01];
    let dome = SiteSegment::new(399_101, pier.body(), Frame::EarthFixed, offset).unwrap();
    ks.register_site(pier).unwrap();
    ks.register_site(dome).unwrap();

    for hour in [0, 6, 13] {
        let instant = t(hour);
        let from_dome = ks
            .position_of(Body::Moon, dome.body(), Frame::EarthFixed, &instant)
            .unwrap();
        let from_earth = ks
            .position_of(Body::Moon, Body::Earth, Frame::EarthFixed, &instant)
            .unwrap();
        let expected = sub(&sub(&from_earth, &[6378.0, 0.0, 0.0]), &[0.0, 0.0, 0.01]);
        for i in 0..3 {
            assert!((from_dome[i] - expected[i]).abs() < 1e-9, "hour {hour}");
        }
    }
}

#[test]
fn sibling_sites_skip_the_provider() {
    let mut ks = KernelSet::new(Spinning::default());
    let a = earth_site(399_100, [6378.0, 0.0, 0.0]);
    let b = earth_site(399_200, [0.0, 6378.0, 0.0]);
    ks.register_site(a).unwrap();
    ks.register_site(b).unwrap();
    let v = ks
        .position_of(b.body(), a.body(), Frame::EarthFixed, &t(0))
        .unwrap();
    assert_eq!(v, [-6378.0, 6378.0, 0.0]);
    assert_eq!(ks.provider().queries.load(Ordering::SeqCst), 0);
}

#[test]
fn child_needs_registered_parent() {
    let mut ks = KernelSet::new(Spinning::default());
    let parent = Body::Site(399_100);
    let orphan = SiteSegment::new(399_101, parent, Frame::EarthFixed, [0.0, 0.0, 1.0]).unwrap();
    let err = ks.register_site(orphan).unwrap_err();
    assert_eq!(err, AdapterError::MissingSite(399_100));
    assert_eq!(err.to_string(), "site 399100 is not registered");
    assert_eq!(ks.site_count(), 0);
}

#[test]
fn identical_bodies_rejected() {
    let ks = KernelSet::new(Spinning::default());
    assert_eq!(
        ks.position_of(Body::Moon, Body::Moon, Frame::Inertial, &t(0)),
        Err(AdapterError::IdenticalBodies(301))
    );
}

#[test]
fn shared_kernel_set_across_threads() {
    let mut ks = KernelSet::new(Arc::new(Spinning::default()));
    ks.register_site(earth_site(399_100, [6378.0, 0.0, 0.0]))
        .unwrap();
    let ks = Arc::new(ks);

    let sequential: Vec<Vec3> = (0..8)
        .map(|h| {
            ks.position_of(Body::Moon, Body::Site(399_100), Frame::Inertial, &t(h))
                .unwrap()
        })
        .collect();
    let threaded: Vec<Vec3> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|h| {
                let ks = Arc::clone(&ks);
                s.spawn(move || {
                    ks.position_of(Body::Moon, Body::Site(399_100), Frame::Inertial, &t(h))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, threaded);
}
