//! Lunar observation geometry.
//!
//! Reduces Sun, Moon and observer vectors from an injected
//! [`EphemerisProvider`](luna_core::EphemerisProvider) to zenith angle,
//! azimuth, phase angle, phase sign and illuminated fraction.
//!
//! The phase sign is read from the selenographic longitudes of the Sun and
//! the sub-observer point at the same instant. Timestamps without a UTC
//! offset are rejected with [`GeometryError::InvalidInput`] and a
//! `tracing` warning.

pub mod config;
pub mod coordinates;
pub mod error;
pub mod horizon;
pub mod location;
pub mod observation;
pub mod phase;
pub mod selenographic;

pub use config::{DEFAULT_EARTH_SITE_CODE, DEFAULT_MOON_SITE_CODE, ObservationConfig, ZenithPath};
pub use coordinates::{
    LatLonHeight, to_planetographic, to_planetographic_multiple, to_rectangular,
    to_rectangular_multiple,
};
pub use error::GeometryError;
pub use horizon::{
    HorizontalCoords, compute_zenith_azimuth, compute_zenith_azimuth_rotated,
    zenith_azimuth_direct, zenith_azimuth_via_kernel,
};
pub use location::{ObserverLocation, SurfaceBody};
pub use observation::{
    LunarObservation, observe, observe_batch, observe_body, observe_from_rectangular,
};
pub use phase::{PhaseSign, compute_illuminated_fraction, compute_phase_angle, compute_phase_sign};
pub use selenographic::{
    AU_KM, MoonSunData, SelenographicCoords, SubObserverPoint, fold_lat_lon, selenographic_coords,
    sub_observer_point, sun_moon_data, sun_moon_data_batch,
};
