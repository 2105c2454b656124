//! # Radio Frequency Propogation
//!
//! `propah` runs radio propogation studies over the terrain held in a
//! [terrain::TileStore]: line of sight and obstruction analysis,
//! antenna patterns, and sweeps that drive a point-to-point
//! [PropagationModel] out to every edge cell of the loaded terrain.

pub mod antenna;
mod error;
pub mod fresnel;
pub mod los;
mod model;
pub mod obstruction;
mod params;
pub mod signal;
pub mod sweep;

pub use {
    crate::{
        antenna::AntennaPattern,
        error::PropahError,
        model::{ElevationProfile, FreeSpace, P2pResult, PropagationModel},
        params::{Climate, Polarization, PropagationParameters},
        signal::OutputQuantity,
        sweep::SweepConfig,
    },
    terrain,
};
