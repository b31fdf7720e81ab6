//! Frame and vector helpers for lunar observation geometry.
//!
//! Provides 3-vector algebra, rotation matrices, Cartesian to latitudinal
//! conversion and geodetic (planetographic) conversion on a biaxial
//! spheroid.

pub mod geodetic;
pub mod latitudinal;
pub mod rotation;
pub mod vector;

pub use geodetic::{
    GeodeticCoords, Spheroid, geodetic_to_rectangular, rectangular_to_geodetic,
    spheroid_intercept, surface_point_latitude,
};
pub use latitudinal::{
    LatitudinalCoords, cartesian_to_latitudinal, normalize_deg_180, normalize_deg_360,
};
pub use rotation::{IDENTITY, Mat3, mtxv, mxm, mxv, rot_x, rot_y, rot_z, transpose};
pub use vector::{Vec3, add, angle_between_rad, cross, dot, norm, scale, sub, unit};
