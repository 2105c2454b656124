//! Spherical earth geodesy.
//!
//! All routines treat the earth as a sphere and clamp the arguments
//! of inverse trigonometric functions into their domain rather than
//! produce `NaN`.

mod angles;
mod elevation_angle;
mod great_circle;

pub use self::{
    angles::{lon_diff, reduce_angle},
    elevation_angle::{elevation_angle, subtended_angle},
    great_circle::{azimuth, destination, distance, sail},
};
