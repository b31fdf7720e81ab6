//! Full lunar observation records.
//!
//! [`observe`] and [`observe_batch`] produce one [`LunarObservation`] per
//! timestamp for a surface site. [`observe_from_rectangular`] is the fast
//! path for arbitrary observer positions (spacecraft, off-surface points)
//! and [`observe_body`] does the same for an observer the provider already
//! knows. Both leave zenith and azimuth empty.

use luna_core::{Body, EphemerisProvider, Frame, KernelSet, Query};
use luna_frames::{Vec3, add, mxv, norm, sub};
use luna_time::{Instant, Timestamp, format_timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ObservationConfig, ZenithPath};
use crate::error::{GeometryError, require_finite};
use crate::horizon::{HorizontalCoords, zenith_azimuth_direct, zenith_azimuth_via_kernel};
use crate::location::{ObserverLocation, SurfaceBody};
use crate::phase::{
    PhaseSign, compute_illuminated_fraction, compute_phase_angle, compute_phase_sign,
};
use crate::selenographic::{MoonSunData, selenographic_coords, sub_observer_point};

/// Lunar quantities for one observer at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarObservation {
    /// UTC time as `%Y-%m-%d %H:%M:%S`. RFC 3339 text input is converted
    /// to UTC; other text input is kept verbatim.
    pub timestamp: String,
    pub dist_sun_moon_au: f64,
    pub dist_sun_moon_km: f64,
    pub dist_obs_moon_km: f64,
    pub lon_sun_rad: f64,
    pub lat_sun_rad: f64,
    /// Selenographic latitude of the observer (sub-observer point), degrees.
    pub lat_obs_deg: f64,
    /// Selenographic longitude of the observer (sub-observer point), degrees.
    pub lon_obs_deg: f64,
    /// Phase angle carrying the phase sign: negative while waxing.
    pub mpa_deg: f64,
    pub phase_angle_deg: f64,
    pub phase_sign: PhaseSign,
    pub illuminated_fraction: f64,
    pub azimuth_deg: Option<f64>,
    pub zenith_deg: Option<f64>,
}

impl LunarObservation {
    pub fn moon_sun(&self) -> MoonSunData {
        MoonSunData {
            lon_sun_rad: self.lon_sun_rad,
            lat_sun_rad: self.lat_sun_rad,
            dist_sun_moon_km: self.dist_sun_moon_km,
            dist_sun_moon_au: self.dist_sun_moon_au,
        }
    }

    pub fn horizontal(&self) -> Option<HorizontalCoords> {
        Some(HorizontalCoords {
            zenith_deg: self.zenith_deg?,
            azimuth_deg: self.azimuth_deg?,
        })
    }
}

/// Where the observer sits relative to the Moon, Moon-fixed frame.
struct ObserverOnMoon {
    from_moon: Vec3,
    lat_deg: f64,
    lon_deg: f64,
}

impl ObserverOnMoon {
    /// Observer off the surface, located by planetocentric coordinates.
    fn planetocentric(from_moon: Vec3) -> Result<Self, GeometryError> {
        let sel = selenographic_coords(&from_moon)?;
        Ok(Self {
            from_moon,
            lat_deg: sel.lat_deg,
            lon_deg: sel.lon_deg,
        })
    }
}

fn build_record(
    timestamp: String,
    sun_from_moon: &Vec3,
    observer: &ObserverOnMoon,
    horizontal: Option<HorizontalCoords>,
) -> Result<LunarObservation, GeometryError> {
    let moon_sun = MoonSunData::from_moon_fixed(sun_from_moon)?;
    let phase = compute_phase_angle(sun_from_moon, &[0.0; 3], &observer.from_moon)?;
    let sign = compute_phase_sign(moon_sun.lon_sun_deg(), observer.lon_deg)?;
    let fraction = compute_illuminated_fraction(phase)?;

    Ok(LunarObservation {
        timestamp,
        dist_sun_moon_au: moon_sun.dist_sun_moon_au,
        dist_sun_moon_km: moon_sun.dist_sun_moon_km,
        dist_obs_moon_km: norm(&observer.from_moon),
        lon_sun_rad: moon_sun.lon_sun_rad,
        lat_sun_rad: moon_sun.lat_sun_rad,
        lat_obs_deg: observer.lat_deg,
        lon_obs_deg: observer.lon_deg,
        mpa_deg: sign.factor() * phase,
        phase_angle_deg: phase,
        phase_sign: sign,
        illuminated_fraction: fraction,
        azimuth_deg: horizontal.map(|h| h.azimuth_deg),
        zenith_deg: horizontal.map(|h| h.zenith_deg),
    })
}

/// Per-location state shared across a batch: validated inputs and, on the
/// kernel path, a kernel set holding the site.
struct SiteObserver<'a, P: EphemerisProvider + ?Sized> {
    provider: &'a P,
    location: &'a ObserverLocation,
    config: &'a ObservationConfig,
    kernels: Option<KernelSet<&'a P>>,
}

impl<'a, P: EphemerisProvider + ?Sized> SiteObserver<'a, P> {
    fn new(
        provider: &'a P,
        location: &'a ObserverLocation,
        config: &'a ObservationConfig,
    ) -> Result<Self, GeometryError> {
        config.validate()?;
        location.validate()?;
        let kernels = match config.zenith_path {
            ZenithPath::Direct => None,
            ZenithPath::Kernel => {
                let code = config.site_code(location.body);
                let mut ks = KernelSet::new(provider);
                ks.register_site(location.site_segment(code, config.spheroid(location.body))?)?;
                Some(ks)
            }
        };
        Ok(Self {
            provider,
            location,
            config,
            kernels,
        })
    }

    fn observer_on_moon(&self, instant: &Instant) -> Result<ObserverOnMoon, GeometryError> {
        let provider = self.provider;
        let spheroid = self.config.spheroid(self.location.body);
        let site = self.location.body_fixed_position_km(spheroid);
        let from_moon = match self.location.body {
            SurfaceBody::Moon => site,
            SurfaceBody::Earth => {
                let frame = Frame::MoonFixed;
                let earth = provider.position_of(Body::Earth, Body::Moon, frame, instant)?;
                let rot = provider.rotation(Frame::EarthFixed, frame, instant)?;
                add(&earth, &mxv(&rot, &site))
            }
        };
        let sub_point = sub_observer_point(&from_moon, &self.config.moon_spheroid)?;
        Ok(ObserverOnMoon {
            from_moon,
            lat_deg: sub_point.lat_deg,
            lon_deg: sub_point.lon_deg,
        })
    }

    fn horizontal(&self, instant: &Instant) -> Result<HorizontalCoords, GeometryError> {
        match &self.kernels {
            Some(ks) => zenith_azimuth_via_kernel(
                ks,
                self.config.site_code(self.location.body),
                self.location,
                instant,
                self.config,
            ),
            None => zenith_azimuth_direct(self.provider, self.location, instant, self.config),
        }
    }

    fn observe(
        &self,
        instant: &Instant,
        timestamp: String,
    ) -> Result<LunarObservation, GeometryError> {
        let sun = sun_from_moon(self.provider, instant)?;
        let observer = self.observer_on_moon(instant)?;
        let horizontal = self.horizontal(instant)?;
        build_record(timestamp, &sun, &observer, Some(horizontal))
    }
}

fn sun_from_moon<P: EphemerisProvider + ?Sized>(
    provider: &P,
    instant: &Instant,
) -> Result<Vec3, GeometryError> {
    Ok(provider.position_of(Body::Sun, Body::Moon, Frame::MoonFixed, instant)?)
}

/// Record for an observer away from any surface site.
fn record_in_space<P: EphemerisProvider + ?Sized>(
    provider: &P,
    instant: &Instant,
    timestamp: String,
    from_moon: Vec3,
) -> Result<LunarObservation, GeometryError> {
    let observer = ObserverOnMoon::planetocentric(from_moon)?;
    let sun = sun_from_moon(provider, instant)?;
    build_record(timestamp, &sun, &observer, None)
}

/// Convert every timestamp up front so no geometry runs on a bad batch.
pub(crate) fn validate_timestamps(
    timestamps: &[Timestamp],
) -> Result<Vec<(Instant, String)>, GeometryError> {
    timestamps
        .iter()
        .map(|ts| -> Result<(Instant, String), GeometryError> {
            let instant = Instant::try_from(ts)?;
            Ok((instant, format_timestamp(ts).text))
        })
        .collect()
}

/// Observe the Moon from `location` at one timestamp.
pub fn observe<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    timestamp: &Timestamp,
    config: &ObservationConfig,
) -> Result<LunarObservation, GeometryError> {
    let instant = Instant::try_from(timestamp)?;
    let observer = SiteObserver::new(provider, location, config)?;
    observer.observe(&instant, format_timestamp(timestamp).text)
}

/// Observe the Moon from `location` at each timestamp, in input order.
///
/// Every timestamp is validated before any geometry runs; one naive
/// timestamp fails the whole batch.
pub fn observe_batch<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    timestamps: &[Timestamp],
    config: &ObservationConfig,
) -> Result<Vec<LunarObservation>, GeometryError> {
    let instants = validate_timestamps(timestamps)?;
    if instants.is_empty() {
        return Ok(Vec::new());
    }
    let observer = SiteObserver::new(provider, location, config)?;
    debug!(
        count = instants.len(),
        path = ?config.zenith_path,
        body = ?location.body,
        "observing batch"
    );
    instants
        .into_iter()
        .map(|(instant, text)| observer.observe(&instant, text))
        .collect()
}

/// Lunar data for arbitrary observer positions, without zenith/azimuth.
///
/// `positions_km[i]` is the observer at `timestamps[i]`, expressed in
/// `source_frame` and centred on the Earth, or on the Moon when
/// `source_frame` is [`Frame::MoonFixed`]. Observer longitude and latitude
/// are planetocentric.
pub fn observe_from_rectangular<P: EphemerisProvider + ?Sized>(
    provider: &P,
    positions_km: &[Vec3],
    timestamps: &[Timestamp],
    source_frame: Frame,
) -> Result<Vec<LunarObservation>, GeometryError> {
    if positions_km.len() != timestamps.len() {
        return Err(GeometryError::InvalidInput(format!(
            "{} positions for {} timestamps",
            positions_km.len(),
            timestamps.len()
        )));
    }
    for p in positions_km {
        require_finite(p, "observer position")?;
    }
    let instants = validate_timestamps(timestamps)?;
    debug!(
        count = instants.len(),
        frame = source_frame.name(),
        "observing rectangular positions"
    );

    positions_km
        .iter()
        .zip(instants)
        .map(|(pos, (instant, text))| -> Result<LunarObservation, GeometryError> {
            let moon = match source_frame {
                Frame::MoonFixed => [0.0; 3],
                frame => provider.position_of(Body::Moon, Body::Earth, frame, &instant)?,
            };
            let rot = provider.rotation(source_frame, Frame::MoonFixed, &instant)?;
            let from_moon = mxv(&rot, &sub(pos, &moon));
            record_in_space(provider, &instant, text, from_moon)
        })
        .collect()
}

/// Lunar data for an observer body the provider can place, such as a
/// registered site or a spacecraft, without zenith/azimuth.
///
/// The observer is looked up relative to the Moon in the Moon-fixed frame
/// at each timestamp. Observer longitude and latitude are planetocentric.
/// Timestamps are validated before any provider query.
pub fn observe_body<P: EphemerisProvider + ?Sized>(
    provider: &P,
    observer: Body,
    timestamps: &[Timestamp],
) -> Result<Vec<LunarObservation>, GeometryError> {
    let query = Query::new(observer, Body::Moon, Frame::MoonFixed);
    query.validate()?;
    let instants = validate_timestamps(timestamps)?;
    debug!(
        count = instants.len(),
        observer = observer.code(),
        "observing from body"
    );

    instants
        .into_iter()
        .map(|(instant, text)| -> Result<LunarObservation, GeometryError> {
            let from_moon = provider.position(&query, &instant)?;
            record_in_space(provider, &instant, text, from_moon)
        })
        .collect()
}
