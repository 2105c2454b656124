//! Deciding which terrain a study needs, and loading it.

use crate::{options::TerrainArgs, udt::load_udt};
use anyhow::Result;
use log::info;
use terrain::{
    sdf::{DirLoader, Resolution},
    udt::apply_features,
    Region, Site, StoreConfig, TileStore,
};

/// Longest analysis range (miles).
pub const MAX_RANGE: f64 = 1000.0;

/// Returns how far (miles) to analyze around `tx`: `max_range` if
/// given, otherwise the sum of the transmitter's and receiver's radio
/// horizons.
pub fn analysis_range(store: &TileStore, tx: &Site, rx_altitude: f64, max_range: Option<f64>) -> f64 {
    let ground = store.try_elevation(tx.lat, tx.lon).unwrap_or(0.0);
    let tx_range = (1.5 * (tx.alt + ground)).max(0.0).sqrt();
    let rx_range = (1.5 * rx_altitude).max(0.0).sqrt();
    max_range
        .unwrap_or(tx_range + rx_range)
        .clamp(0.0, MAX_RANGE)
}

/// Returns the smallest region holding every site and the terrain
/// `ranges[i]` miles around `transmitters[i]`.
pub fn study_region(
    config: &StoreConfig,
    transmitters: &[Site],
    ranges: &[f64],
    others: &[Site],
) -> Option<Region> {
    transmitters
        .iter()
        .zip(ranges)
        .map(|(tx, range)| Region::around(tx, *range, config).union(Region::containing(tx)))
        .chain(others.iter().map(Region::containing))
        .reduce(Region::union)
}

/// Terrain loaded for a study.
pub struct Study {
    pub store: TileStore,

    /// Analysis range (miles) around each transmitter.
    pub ranges: Vec<f64>,
}

/// Loads the terrain around `transmitters`, out to `max_range` miles
/// or their radio horizons for a receiver `rx_altitude` feet up, and
/// under `others`. User-defined terrain goes on last.
pub fn load_study(
    args: &TerrainArgs,
    transmitters: &[Site],
    others: &[Site],
    rx_altitude: f64,
    max_range: Option<f64>,
) -> Result<Study> {
    let resolution = if args.high_res {
        Resolution::High
    } else {
        Resolution::Standard
    };
    let config = StoreConfig::new(args.capacity, resolution)?;
    let loader = DirLoader::new(args.sdf_dir.clone());
    let mut store = TileStore::new(config);

    // Ground under the transmitters sets their radio horizons.
    if let Some(sites) = study_region(&config, &[], &[], &[transmitters, others].concat()) {
        store.load_region(&loader, &sites)?;
    }
    let ranges: Vec<f64> = transmitters
        .iter()
        .map(|tx| analysis_range(&store, tx, rx_altitude, max_range))
        .collect();
    if let Some(region) = study_region(&config, transmitters, &ranges, others) {
        let loaded = store.load_region(&loader, &region)?;
        info!("{loaded} more tiles loaded, {} resident", store.len());
    }

    if let Some(path) = &args.udt {
        let features = load_udt(path)?;
        apply_features(&mut store, &features);
    }
    Ok(Study { store, ranges })
}
