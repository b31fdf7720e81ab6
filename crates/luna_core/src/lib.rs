//! Ephemeris adapter seam and kernel abstraction.
//!
//! The geometry engine never talks to an ephemeris toolkit directly. It asks
//! an [`EphemerisProvider`] for "position of body B relative to body C in
//! frame F at instant T" and for frame rotations. [`KernelSet`] layers
//! observer-site segments on top of any provider, the way a custom SPK
//! kernel adds a surface point to a loaded kernel pool.

pub mod error;
pub mod kernel;

use std::sync::Arc;

use luna_frames::{Mat3, Vec3};
use luna_time::Instant;
use serde::{Deserialize, Serialize};

pub use error::AdapterError;
pub use kernel::{KernelSet, SiteSegment};

/// Bodies known to the query contract.
///
/// `Site` covers observer points registered at runtime (surface stations,
/// spacecraft) under a caller-chosen code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Earth,
    Moon,
    Site(i32),
}

impl Body {
    /// NAIF-style body code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Sun => 10,
            Self::Earth => 399,
            Self::Moon => 301,
            Self::Site(code) => code,
        }
    }

    /// Convert a NAIF-style code into a [`Body`]; unknown codes become sites.
    pub const fn from_code(code: i32) -> Self {
        match code {
            10 => Self::Sun,
            399 => Self::Earth,
            301 => Self::Moon,
            other => Self::Site(other),
        }
    }

    pub const fn is_site(self) -> bool {
        matches!(self, Self::Site(_))
    }

    /// Body-fixed frame of a natural body with one.
    pub const fn body_fixed_frame(self) -> Option<Frame> {
        match self {
            Self::Earth => Some(Frame::EarthFixed),
            Self::Moon => Some(Frame::MoonFixed),
            Self::Sun | Self::Site(_) => None,
        }
    }
}

/// Reference frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    /// Inertial equatorial frame.
    Inertial,
    /// Earth body-fixed (terrestrial) frame.
    EarthFixed,
    /// Moon body-fixed mean-Earth/polar-axis frame.
    MoonFixed,
}

impl Frame {
    /// Compact frame code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Inertial => 0,
            Self::EarthFixed => 1,
            Self::MoonFixed => 2,
        }
    }

    /// Convert a compact frame code into a [`Frame`].
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Inertial),
            1 => Some(Self::EarthFixed),
            2 => Some(Self::MoonFixed),
            _ => None,
        }
    }

    /// Toolkit frame name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inertial => "J2000",
            Self::EarthFixed => "ITRF93",
            Self::MoonFixed => "MOON_ME",
        }
    }

    /// Parse a toolkit frame name (case-insensitive). `IAU_EARTH` and
    /// `IAU_MOON` alias the body-fixed frames.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "J2000" | "ICRF" => Some(Self::Inertial),
            "ITRF93" | "IAU_EARTH" => Some(Self::EarthFixed),
            "MOON_ME" | "IAU_MOON" => Some(Self::MoonFixed),
            _ => None,
        }
    }

    /// Body the frame rotates with, if body-fixed.
    pub const fn center(self) -> Option<Body> {
        match self {
            Self::Inertial => None,
            Self::EarthFixed => Some(Body::Earth),
            Self::MoonFixed => Some(Body::Moon),
        }
    }
}

/// Single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    pub target: Body,
    pub center: Body,
    pub frame: Frame,
}

impl Query {
    pub fn new(target: Body, center: Body, frame: Frame) -> Self {
        Self {
            target,
            center,
            frame,
        }
    }

    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.target == self.center {
            return Err(AdapterError::IdenticalBodies(self.target.code()));
        }
        Ok(())
    }
}

/// Injected ephemeris capability.
///
/// Implementations may block (kernel loading) but must answer synchronously.
/// Geometric positions only: no light-time or aberration corrections.
pub trait EphemerisProvider: Send + Sync {
    /// Position of `query.target` relative to `query.center`, expressed in
    /// `query.frame`, in km.
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError>;

    /// Rotation matrix `m` such that `m · v_from = v_to`.
    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError>;

    /// Shorthand for [`EphemerisProvider::position`].
    fn position_of(
        &self,
        target: Body,
        center: Body,
        frame: Frame,
        instant: &Instant,
    ) -> Result<Vec3, AdapterError> {
        self.position(&Query::new(target, center, frame), instant)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        (**self).position(query, instant)
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        (**self).rotation(from, to, instant)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Arc<P> {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        (**self).position(query, instant)
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        (**self).rotation(from, to, instant)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Box<P> {
    fn position(&self, query: &Query, instant: &Instant) -> Result<Vec3, AdapterError> {
        (**self).position(query, instant)
    }

    fn rotation(&self, from: Frame, to: Frame, instant: &Instant) -> Result<Mat3, AdapterError> {
        (**self).rotation(from, to, instant)
    }
}
