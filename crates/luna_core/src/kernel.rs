//! Observer-site segments layered over an ephemeris provider.
//!
//! A [`SiteSegment`] fixes a point relative to a center body in one frame,
//! e.g. a telescope in the Earth-fixed frame. [`KernelSet`] resolves any body
//! to its natural anchor by walking the segment chain, then asks the wrapped
//! provider only for natural-body positions.

use std::collections::HashMap;

use luna_frames::{Mat3, Spheroid, Vec3, add, geodetic_to_rectangular, mxv, sub};
use luna_time::Instant;
use tracing::debug;

use crate::error::AdapterError;
use crate::{Body, EphemerisProvider, Frame, Query};

/// A fixed point relative to `center`, expressed in `frame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteSegment {
    code: i32,
    center: Body,
    frame: Frame,
    position_km: Vec3,
}

impl SiteSegment {
    pub fn new(
        code: i32,
        center: Body,
        frame: Frame,
        position_km: Vec3,
    ) -> Result<Self, AdapterError> {
        if !Body::from_code(code).is_site() {
            return Err(AdapterError::ReservedCode(code));
        }
        if center == Body::Site(code) {
            return Err(AdapterError::InvalidSite("site cannot be its own center"));
        }
        if position_km.iter().any(|c| !c.is_finite()) {
            return Err(AdapterError::InvalidSite("position must be finite"));
        }
        Ok(Self {
            code,
            center,
            frame,
            position_km,
        })
    }

    /// Surface site on Earth or Moon from geodetic/planetographic
    /// coordinates. Altitude is in meters above the spheroid.
    pub fn from_geodetic(
        code: i32,
        body: Body,
        lat_deg: f64,
        lon_deg: f64,
        altitude_m: f64,
        spheroid: &Spheroid,
    ) -> Result<Self, AdapterError> {
        let frame = body
            .body_fixed_frame()
            .ok_or(AdapterError::UnsupportedBody(body.code()))?;
        let lat_ok = (-90.0..=90.0).contains(&lat_deg);
        if !lat_ok || !lon_deg.is_finite() || !altitude_m.is_finite() {
            return Err(AdapterError::InvalidSite("geodetic coordinates out of range"));
        }
        let xyz = geodetic_to_rectangular(
            lon_deg.to_radians(),
            lat_deg.to_radians(),
            altitude_m / 1000.0,
            spheroid,
        );
        Self::new(code, body, frame, xyz)
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn body(&self) -> Body {
        Body::Site(self.code)
    }

    pub fn center(&self) -> Body {
        self.center
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn position_km(&self) -> Vec3 {
        self.position_km
    }
}

/// Provider wrapper that understands registered sites.
#[derive(Debug, Clone)]
pub struct KernelSet<P> {
    provider: P,
    sites: HashMap<i32, SiteSegment>,
}

impl<P: EphemerisProvider> KernelSet<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sites: HashMap::new(),
        }
    }

    /// Register a site. Its center must already be resolvable.
    pub fn register_site(&mut self, segment: SiteSegment) -> Result<(), AdapterError> {
        if self.sites.contains_key(&segment.code) {
            return Err(AdapterError::DuplicateSite(segment.code));
        }
        if let Body::Site(parent) = segment.center {
            if !self.sites.contains_key(&parent) {
                return Err(AdapterError::MissingSite(parent));
            }
        }
        debug!(
            code = segment.code,
            center = segment.center.code(),
            frame = segment.frame.name(),
            "site segment registered"
        );
        self.sites.insert(segment.code, segment);
        Ok(())
    }

    /// Register a site, replacing any existing segment with the same code.
    pub fn replace_site(
        &mut self,
        segment: SiteSegment,
    ) -> Result<Option<SiteSegment>, AdapterError> {
        let previous = self.sites.remove(&segment.code);
        if let Err(e) = self.register_site(segment) {
            if let Some(prev) = previous {
                self.sites.insert(prev.code, prev);
            }
            return Err(e);
        }
        Ok(previous)
    }

    /// Unload a site. Returns the removed segment, if any.
    pub fn remove_site(&mut self, code: i32) -> Option<SiteSegment> {
        let removed = self.sites.remove(&code);
        if removed.is_some() {
            debug!(code, "site segment removed");
        }
        removed
    }

    pub fn site(&self, code: i32) -> Option<&SiteSegment> {
        self.sites.get(&code)
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Walk `body` down its segment chain to a natural body, accumulating
    /// the offset in `frame`.
    fn resolve_to_natural(
        &self,
        body: Body,
        frame: Frame,
        instant: &Instant,
    ) -> Result<(Body, Vec3), AdapterError> {
        let mut current = body;
        let mut offset = [0.0f64; 3];
        let mut hops = 0usize;

        while let Body::Site(code) = current {
            let Some(seg) = self.sites.get(&code) else {
                return Err(AdapterError::MissingSite(code));
            };
            let local = if seg.frame == frame {
                seg.position_km
            } else {
                let m = self.provider.rotation(seg.frame, frame, instant)?;
                mxv(&m, &seg.position_km)
            };
            offset = add(&offset, &local);
            current = seg.center;

            hops += 1;
            if hops > self.sites.len() {
                return Err(AdapterError::InvalidSite("cyclic site chain"));
            }
        }

        Ok((current, offset))
    }
}

impl<P: EphemerisProvider> EphemerisProvider for KernelSet<P> {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        query.validate()?;
        if !query.target.is_site() && !query.center.is_site() {
            return self.provider.position(query, instant);
        }

        let (target, target_off) = self.resolve_to_natural(query.target, query.frame, instant)?;
        let (center, center_off) = self.resolve_to_natural(query.center, query.frame, instant)?;

        let base = if target == center {
            [0.0; 3]
        } else {
            let natural = Query::new(target, center, query.frame);
            self.provider.position(&natural, instant)?
        };

        Ok(sub(&add(&base, &target_off), &center_off))
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        self.provider.rotation(from, to, instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luna_frames::{IDENTITY, mxm, norm, rot_z, transpose};

    /// Moon 384400 km along +x, Sun far along +y. Earth-fixed frame is the
    /// inertial frame turned 90 degrees about z.
    struct Fixture;

    impl EphemerisProvider for Fixture {
        fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
            let at = |b: Body| match b {
                Body::Earth => Ok([0.0, 0.0, 0.0]),
                Body::Moon => Ok([384_400.0, 0.0, 0.0]),
                Body::Sun => Ok([0.0, 1.496e8, 0.0]),
                Body::Site(c) => Err(AdapterError::UnsupportedBody(c)),
            };
            let v = sub(&at(query.target)?, &at(query.center)?);
            let m = self.rotation(Frame::Inertial, query.frame, instant)?;
            Ok(mxv(&m, &v))
        }

        fn rotation(&self, from: Frame, to: Frame, _: &Instant) -> Result<Mat3, AdapterError> {
            let to_fixed = |f: Frame| match f {
                Frame::Inertial | Frame::MoonFixed => IDENTITY,
                Frame::EarthFixed => rot_z(std::f64::consts::FRAC_PI_2),
            };
            Ok(mxm(&to_fixed(to), &transpose(&to_fixed(from))))
        }
    }

    fn t0() -> Instant {
        Instant::from_utc_ymd_hms(2024, 1, 25, 0, 0, 0).unwrap()
    }

    fn earth_site(code: i32, position_km: Vec3) -> SiteSegment {
        SiteSegment::new(code, Body::Earth, Frame::EarthFixed, position_km).unwrap()
    }

    #[test]
    fn natural_queries_pass_through() {
        let ks = KernelSet::new(Fixture);
        let p = ks
            .position_of(Body::Moon, Body::Earth, Frame::Inertial, &t0())
            .unwrap();
        assert_eq!(p, [384_400.0, 0.0, 0.0]);
    }

    #[test]
    fn site_offset_is_rotated_into_query_frame() {
        let mut ks = KernelSet::new(Fixture);
        // Earth-fixed +x is inertial +y under the fixture rotation.
        ks.register_site(earth_site(399_100, [6378.0, 0.0, 0.0]))
            .unwrap();
        let p = ks
            .position_of(Body::Moon, Body::Site(399_100), Frame::Inertial, &t0())
            .unwrap();
        assert!((p[0] - 384_400.0).abs() < 1e-6);
        assert!((p[1] + 6378.0).abs() < 1e-6);
    }

    #[test]
    fn site_to_its_own_center() {
        let mut ks = KernelSet::new(Fixture);
        let seg =
            SiteSegment::new(301_100, Body::Moon, Frame::MoonFixed, [0.0, 0.0, 1736.0]).unwrap();
        ks.register_site(seg).unwrap();
        let p = ks
            .position_of(Body::Site(301_100), Body::Moon, Frame::MoonFixed, &t0())
            .unwrap();
        assert!((norm(&p) - 1736.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_site_rejected() {
        let mut ks = KernelSet::new(Fixture);
        let seg = earth_site(399_100, [6378.0, 0.0, 0.0]);
        ks.register_site(seg).unwrap();
        let again = ks.register_site(seg);
        assert_eq!(again, Err(AdapterError::DuplicateSite(399_100)));
        assert_eq!(ks.site_count(), 1);
    }

    #[test]
    fn replace_site_swaps_segment() {
        let mut ks = KernelSet::new(Fixture);
        let a = earth_site(399_100, [6378.0, 0.0, 0.0]);
        let b = earth_site(399_100, [0.0, 6378.0, 0.0]);
        ks.register_site(a).unwrap();
        assert_eq!(ks.replace_site(b).unwrap(), Some(a));
        assert_eq!(ks.site(399_100), Some(&b));
    }

    #[test]
    fn reserved_codes_rejected() {
        assert_eq!(
            SiteSegment::new(301, Body::Earth, Frame::EarthFixed, [1.0, 0.0, 0.0]),
            Err(AdapterError::ReservedCode(301))
        );
    }

    #[test]
    fn unknown_site_fails() {
        let ks = KernelSet::new(Fixture);
        let err = ks
            .position_of(Body::Moon, Body::Site(42), Frame::Inertial, &t0())
            .unwrap_err();
        assert_eq!(err, AdapterError::MissingSite(42));
    }

    #[test]
    fn removed_site_no_longer_resolves() {
        let mut ks = KernelSet::new(Fixture);
        ks.register_site(earth_site(399_100, [6378.0, 0.0, 0.0]))
            .unwrap();
        assert!(ks.remove_site(399_100).is_some());
        assert!(ks.remove_site(399_100).is_none());
        let err = ks
            .position_of(Body::Moon, Body::Site(399_100), Frame::Inertial, &t0())
            .unwrap_err();
        assert_eq!(err, AdapterError::MissingSite(399_100));
    }

    #[test]
    fn geodetic_site_on_moon_uses_moon_frame() {
        let moon = Spheroid::MOON;
        let seg = SiteSegment::from_geodetic(301_100, Body::Moon, 0.0, 0.0, 0.0, &moon).unwrap();
        assert_eq!(seg.frame(), Frame::MoonFixed);
        assert!((seg.position_km()[0] - 1738.1).abs() < 1e-9);

        let on_sun = SiteSegment::from_geodetic(1, Body::Sun, 0.0, 0.0, 0.0, &moon);
        assert_eq!(on_sun, Err(AdapterError::UnsupportedBody(10)));
        let earth = Spheroid::EARTH;
        let past_pole = SiteSegment::from_geodetic(399_100, Body::Earth, 91.0, 0.0, 0.0, &earth);
        assert!(past_pole.is_err());
    }

    #[test]
    fn kernel_set_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KernelSet<Fixture>>();
    }
}
