//! # Terrain
//!
//! `terrain` holds the elevation side of a propagation study: a
//! bounded, paged [TileStore] of SDF tiles, great-circle [Path]
//! sampling across those tiles, and radial terrain averaging for
//! antenna height above average terrain ([haat]).
//!
//! Longitudes are degrees _west_ in `[0, 360)` throughout, elevations
//! in paths and reports are feet, and distances are statute miles.

pub mod constants;
mod error;
pub mod haat;
pub mod math;
mod path;
mod site;
mod store;
pub mod udt;

pub use crate::{
    error::TerrainError,
    path::{Path, PathSample},
    site::Site,
    store::{Bounds, Region, StoreConfig, TileStore, NO_ELEVATION},
};
pub use {geo, sdf};
