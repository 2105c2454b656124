//! User-defined terrain.
//!
//! Buildings, towers, and other man-made obstructions are added on
//! top of the ground elevation before any analysis runs.

use crate::TileStore;
use log::{debug, warn};
use std::collections::BTreeMap;

/// An obstruction standing at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainFeature {
    /// Degrees north.
    pub lat: f64,

    /// Degrees west.
    pub lon: f64,

    /// Height above ground (meters).
    pub height: f64,
}

/// Raises the store's terrain by each of `features`.
///
/// Features with no positive height are ignored. When several land on
/// the same pixel only the tallest is applied. Returns the number of
/// pixels raised.
#[allow(clippy::cast_possible_truncation)]
pub fn apply_features(store: &mut TileStore, features: &[TerrainFeature]) -> usize {
    let dpp = store.resolution().dpp();
    let mut pixels: BTreeMap<(i64, i64), f64> = BTreeMap::new();

    for feature in features {
        let height = feature.height.round_ties_even();
        if height <= 0.0 {
            continue;
        }
        let key = (
            (feature.lat / dpp).round_ties_even() as i64,
            (feature.lon / dpp).round_ties_even() as i64,
        );
        pixels
            .entry(key)
            .and_modify(|tallest| *tallest = tallest.max(height))
            .or_insert(height);
    }

    let mut applied = 0;
    for ((xpix, ypix), height) in pixels {
        #[allow(clippy::cast_precision_loss)]
        let (lat, lon) = (xpix as f64 * dpp, ypix as f64 * dpp);
        if store.add_elevation(lat, lon, height) {
            applied += 1;
        } else {
            warn!("feature at {lat:.5}, {lon:.5} is outside loaded terrain");
        }
    }
    debug!("applied {applied} of {} terrain features", features.len());
    applied
}

#[cfg(test)]
mod tests {
    use super::{apply_features, TerrainFeature};
    use crate::{StoreConfig, TileStore};
    use approx::assert_relative_eq;
    use sdf::{Resolution, Tile, TileKey};

    fn store() -> TileStore {
        let mut store = TileStore::new(StoreConfig::new(1, Resolution::Standard).unwrap());
        store
            .insert(Tile::from_fn(TileKey::new(40, 75), Resolution::Standard, |_, _| 20))
            .unwrap();
        store
    }

    fn feature(lat: f64, lon: f64, height: f64) -> TerrainFeature {
        TerrainFeature { lat, lon, height }
    }

    #[test]
    fn test_duplicates_keep_tallest() {
        let mut store = store();
        let dpp = Resolution::Standard.dpp();
        let (lat, lon) = (40.5, 75.5);
        let applied = apply_features(
            &mut store,
            &[
                feature(lat, lon, 30.0),
                // Same pixel, a fraction of a cell away.
                feature(lat + 0.2 * dpp, lon - 0.2 * dpp, 45.0),
                feature(lat, lon, 10.0),
            ],
        );
        assert_eq!(applied, 1);
        assert_relative_eq!(store.elevation(lat, lon), 3.280_84 * 65.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ignored_features() {
        let mut store = store();
        let applied = apply_features(
            &mut store,
            &[
                feature(40.5, 75.5, 0.0),
                feature(40.5, 75.6, -12.0),
                // Off the map.
                feature(42.5, 75.5, 10.0),
            ],
        );
        assert_eq!(applied, 0);
        assert_relative_eq!(store.elevation(40.5, 75.5), 3.280_84 * 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distinct_pixels() {
        let mut store = store();
        let dpp = Resolution::Standard.dpp();
        let applied = apply_features(
            &mut store,
            &[feature(40.5, 75.5, 12.4), feature(40.5 + dpp, 75.5, 7.6)],
        );
        assert_eq!(applied, 2);
        assert_relative_eq!(store.elevation(40.5, 75.5), 3.280_84 * 32.0, epsilon = 1e-9);
        assert_relative_eq!(
            store.elevation(40.5 + dpp, 75.5),
            3.280_84 * 28.0,
            epsilon = 1e-9
        );
    }
}
