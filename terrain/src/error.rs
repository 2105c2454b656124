use sdf::{Resolution, SdfError, TileKey};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("tile store is full, cannot insert {0}")]
    StoreFull(TileKey),

    #[error("unsupported tile store capacity {0}")]
    Capacity(usize),

    #[error("tile {key} has {found:?} resolution, store expects {expected:?}")]
    Resolution {
        key: TileKey,
        expected: Resolution,
        found: Resolution,
    },

    #[error("{0}")]
    Sdf(#[from] SdfError),
}
