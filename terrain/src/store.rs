//! Paged elevation store.
//!
//! A [TileStore] owns a bounded set of adjoining one-degree tiles and
//! resolves `(lat, lon)` coordinates to cells across them. The store
//! never evicts; the tiles an analysis needs are planned with
//! [Region] and loaded up front.

use crate::{
    constants::FEET_PER_METER,
    math::{lon_diff, reduce_angle},
    Site, TerrainError,
};
use log::{debug, warn};
use sdf::{Resolution, Tile, TileKey, TileLoader};

/// Elevation (feet) reported for coordinates outside every resident
/// tile.
pub const NO_ELEVATION: f64 = -5000.0;

/// Line-of-sight mask bit of the first transmitter.
const FIRST_LOS_LAYER: u8 = 1;

/// Fixed limits of a [TileStore].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    capacity: usize,
    resolution: Resolution,
}

impl StoreConfig {
    /// Returns a configuration for a store holding up to `capacity`
    /// tiles of `resolution`.
    ///
    /// `capacity` must be one of 1, 2, 4, 9, 16, 25, 36, 49, or 64.
    pub fn new(capacity: usize, resolution: Resolution) -> Result<Self, TerrainError> {
        match capacity {
            1 | 2 | 4 | 9 | 16 | 25 | 36 | 49 | 64 => Ok(Self {
                capacity,
                resolution,
            }),
            _ => Err(TerrainError::Capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Largest half-width, in degrees, of an analysis region this
    /// store can hold.
    pub fn degree_limit(&self) -> f64 {
        match self.capacity {
            1 => 0.125,
            2 => 0.25,
            4 => 0.5,
            9 => 1.0,
            16 => 1.5,
            25 => 2.0,
            36 => 2.5,
            49 => 3.0,
            _ => 3.5,
        }
    }

    /// Maximum number of samples in a [Path](crate::Path) across this
    /// store.
    pub fn path_capacity(&self) -> usize {
        match (self.resolution, self.capacity) {
            (Resolution::Standard, 1 | 2 | 4) => 4_950,
            (Resolution::Standard, 9) => 10_870,
            (Resolution::Standard, 16) => 19_240,
            (Resolution::Standard, 25) => 30_025,
            (Resolution::Standard, 36) => 43_217,
            (Resolution::Standard, 49) => 58_813,
            (Resolution::Standard, _) => 76_810,
            (Resolution::High, 1) => 5_092,
            (Resolution::High, 2 | 4) => 14_844,
            (Resolution::High, 9) => 32_600,
            (Resolution::High, 16) => 57_713,
            (Resolution::High, 25) => 90_072,
            (Resolution::High, 36) => 129_650,
            (Resolution::High, 49) => 176_437,
            (Resolution::High, _) => 230_430,
        }
    }
}

/// Integer degree extents covered by the resident tiles.
///
/// `max_west` may be numerically smaller than `min_west` when the
/// coverage straddles the prime meridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_north: i32,
    pub max_north: i32,
    pub min_west: i32,
    pub max_west: i32,
}

impl Bounds {
    fn from_key(key: TileKey) -> Self {
        Self {
            min_north: key.min_north,
            max_north: key.max_north,
            min_west: key.min_west,
            max_west: key.max_west,
        }
    }

    fn extend(&mut self, key: TileKey) {
        self.max_north = self.max_north.max(key.max_north);
        self.min_north = self.min_north.min(key.min_north);
        if (key.max_west - self.max_west).abs() < 180 {
            self.max_west = self.max_west.max(key.max_west);
        } else {
            self.max_west = self.max_west.min(key.max_west);
        }
        if (key.min_west - self.min_west).abs() < 180 {
            self.min_west = self.min_west.min(key.min_west);
        } else {
            self.min_west = self.min_west.max(key.min_west);
        }
    }
}

/// A block of tiles to load, identified by the southeast corners of
/// its outermost tiles.
///
/// `min_lon`/`max_lon` are degrees west in `[0, 360)`; the block spans
/// westward from `min_lon` to `max_lon` and may wrap past 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min_lat: i32,
    pub max_lat: i32,
    pub min_lon: i32,
    pub max_lon: i32,
}

impl Region {
    /// Returns the single tile region containing `site`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(site: &Site) -> Self {
        let lat = site.lat.floor() as i32;
        let lon = site.lon.floor() as i32;
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    /// Returns the region needed to analyze out to `range` miles
    /// around `site`, clamped to what `config` can hold.
    #[allow(clippy::cast_possible_truncation)]
    pub fn around(site: &Site, range: f64, config: &StoreConfig) -> Self {
        let deg_limit = config.degree_limit();
        let deg_range = range / 57.0;
        // Degrees of longitude shrink toward the poles.
        let deg_range_lon = deg_range / site.lat.abs().min(70.0).to_radians().cos();
        let deg_range = deg_range.min(deg_limit);
        let deg_range_lon = deg_range_lon.min(deg_limit);

        Self {
            min_lat: (site.lat - deg_range).floor() as i32,
            max_lat: (site.lat + deg_range).floor() as i32,
            min_lon: ((site.lon - deg_range_lon).floor() as i32).rem_euclid(360),
            max_lon: ((site.lon + deg_range_lon).floor() as i32).rem_euclid(360),
        }
    }

    /// Returns the smallest region covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let min_lon = if lon_diff(f64::from(other.min_lon), f64::from(self.min_lon)) < 0.0 {
            other.min_lon
        } else {
            self.min_lon
        };
        let max_lon = if lon_diff(f64::from(other.max_lon), f64::from(self.max_lon)) >= 0.0 {
            other.max_lon
        } else {
            self.max_lon
        };
        Self {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon,
            max_lon,
        }
    }

    /// Returns the key of every tile in this region.
    pub fn keys(&self) -> Vec<TileKey> {
        let width = reduce_angle(f64::from(self.max_lon - self.min_lon));
        let start = if self.max_lon - self.min_lon <= 180 {
            self.min_lon
        } else {
            self.max_lon
        };
        let mut keys = Vec::new();
        for dlon in 0..=width {
            for lat in self.min_lat..=self.max_lat {
                keys.push(TileKey::new(lat, start + dlon));
            }
        }
        keys
    }
}

/// A bounded collection of elevation tiles and the analysis grids
/// layered on them.
#[derive(Debug, Clone)]
pub struct TileStore {
    config: StoreConfig,
    tiles: Vec<Tile>,

    /// Extents covered by resident tiles.
    bounds: Option<Bounds>,

    /// Lowest and highest elevation (meters) across resident tiles.
    elevation_range: Option<(i16, i16)>,

    /// Mask bit handed to the next line-of-sight sweep.
    next_los_layer: u8,

    /// Pass index handed to the next path loss sweep.
    next_pass: u8,
}

impl TileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            tiles: Vec::with_capacity(config.capacity()),
            bounds: None,
            elevation_range: None,
            next_los_layer: FIRST_LOS_LAYER,
            next_pass: 1,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn resolution(&self) -> Resolution {
        self.config.resolution()
    }

    /// Resident tiles, in load order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() >= self.config.capacity()
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.tiles.iter().any(|tile| tile.key() == key)
    }

    /// Extents covered by resident tiles, if any.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Lowest and highest elevation (meters) across resident tiles.
    pub fn elevation_range(&self) -> Option<(i16, i16)> {
        self.elevation_range
    }

    /// Adds `tile` to the store.
    ///
    /// Returns `Ok(false)` if a tile with the same bounds is already
    /// resident.
    pub fn insert(&mut self, tile: Tile) -> Result<bool, TerrainError> {
        let key = tile.key();
        if tile.resolution() != self.resolution() {
            return Err(TerrainError::Resolution {
                key,
                expected: self.resolution(),
                found: tile.resolution(),
            });
        }
        if self.contains(key) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(TerrainError::StoreFull(key));
        }

        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(key),
            None => self.bounds = Some(Bounds::from_key(key)),
        }
        let (min, max) = (tile.min_elevation(), tile.max_elevation());
        self.elevation_range = Some(match self.elevation_range {
            Some((lo, hi)) => (lo.min(min), hi.max(max)),
            None => (min, max),
        });
        debug!("loaded {key} into page {}", self.tiles.len() + 1);
        self.tiles.push(tile);
        Ok(true)
    }

    /// Loads every tile of `region` not already resident.
    ///
    /// Tiles `loader` has no data for are assumed to be at sea level.
    /// Tiles which don't fit are logged and skipped. Returns the
    /// number of tiles added.
    pub fn load_region<L>(&mut self, loader: &L, region: &Region) -> Result<usize, TerrainError>
    where
        L: TileLoader + ?Sized,
    {
        let mut loaded = 0;
        for key in region.keys() {
            if self.contains(key) {
                continue;
            }
            if self.is_full() {
                warn!("{}", TerrainError::StoreFull(key));
                continue;
            }
            let tile = match loader.load(key, self.resolution())? {
                Some(tile) => tile,
                None => {
                    debug!("region {key} assumed as sea-level");
                    Tile::sea_level(key, self.resolution())
                }
            };
            match self.insert(tile) {
                Ok(true) => loaded += 1,
                Ok(false) => (),
                Err(e @ TerrainError::StoreFull(_)) => warn!("{e}"),
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }

    /// Returns the ground elevation (feet) at the given coordinate, or
    /// [NO_ELEVATION] when no resident tile covers it.
    pub fn elevation(&self, lat: f64, lon: f64) -> f64 {
        self.try_elevation(lat, lon).unwrap_or(NO_ELEVATION)
    }

    /// Returns the ground elevation (feet) at the given coordinate, if
    /// a resident tile covers it.
    pub fn try_elevation(&self, lat: f64, lon: f64) -> Option<f64> {
        self.locate(lat, lon)
            .map(|(idx, x, y)| FEET_PER_METER * f64::from(self.tiles[idx].elevation_at(x, y)))
    }

    /// Raises the terrain at the given coordinate by `meters`, rounded
    /// to whole meters. Returns `false` if no resident tile covers it.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_elevation(&mut self, lat: f64, lon: f64, meters: f64) -> bool {
        match self.locate(lat, lon) {
            Some((idx, x, y)) => {
                let meters = meters
                    .round_ties_even()
                    .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
                let tile = &mut self.tiles[idx];
                tile.add_elevation_at(x, y, meters);
                let (min, max) = (tile.min_elevation(), tile.max_elevation());
                if let Some((lo, hi)) = self.elevation_range.as_mut() {
                    *lo = (*lo).min(min);
                    *hi = (*hi).max(max);
                }
                true
            }
            None => false,
        }
    }

    /// Returns the mask bits at the given coordinate, 0 if unresolved.
    pub fn mask(&self, lat: f64, lon: f64) -> u8 {
        self.locate(lat, lon)
            .map_or(0, |(idx, x, y)| self.tiles[idx].mask_at(x, y))
    }

    /// Sets `bits` in the mask at the given coordinate and returns the
    /// resulting mask.
    pub fn or_mask(&mut self, lat: f64, lon: f64, bits: u8) -> Option<u8> {
        let (idx, x, y) = self.locate(lat, lon)?;
        let tile = &mut self.tiles[idx];
        let value = tile.mask_at(x, y) | bits;
        tile.set_mask_at(x, y, value);
        Some(value)
    }

    /// Overwrites the mask at the given coordinate.
    pub fn put_mask(&mut self, lat: f64, lon: f64, value: u8) -> Option<u8> {
        let (idx, x, y) = self.locate(lat, lon)?;
        self.tiles[idx].set_mask_at(x, y, value);
        Some(value)
    }

    /// Returns the signal byte at the given coordinate, 0 if
    /// unresolved.
    pub fn signal(&self, lat: f64, lon: f64) -> u8 {
        self.locate(lat, lon)
            .map_or(0, |(idx, x, y)| self.tiles[idx].signal_at(x, y))
    }

    /// Overwrites the signal byte at the given coordinate. Returns
    /// `false` if no resident tile covers it.
    pub fn put_signal(&mut self, lat: f64, lon: f64, value: u8) -> bool {
        match self.locate(lat, lon) {
            Some((idx, x, y)) => {
                self.tiles[idx].set_signal_at(x, y, value);
                true
            }
            None => false,
        }
    }

    /// Returns the index of the last loss sweep pass to process the
    /// given coordinate, 0 if none or unresolved.
    pub fn pass(&self, lat: f64, lon: f64) -> u8 {
        self.locate(lat, lon)
            .map_or(0, |(idx, x, y)| self.tiles[idx].pass_at(x, y))
    }

    /// Records that pass `pass` processed the given coordinate.
    pub fn put_pass(&mut self, lat: f64, lon: f64, pass: u8) -> bool {
        match self.locate(lat, lon) {
            Some((idx, x, y)) => {
                self.tiles[idx].set_pass_at(x, y, pass);
                true
            }
            None => false,
        }
    }

    /// Returns the mask bit for the next line-of-sight sweep.
    ///
    /// Successive sweeps get 1, 8, 16, then 32 for every sweep after
    /// the fourth.
    pub fn next_los_layer(&mut self) -> u8 {
        let layer = self.next_los_layer;
        self.next_los_layer = match layer {
            FIRST_LOS_LAYER => 8,
            8 => 16,
            _ => 32,
        };
        layer
    }

    /// Returns a fresh pass index for a path loss sweep.
    ///
    /// When indices run out every tile's pass grid is cleared and
    /// numbering restarts at 1.
    pub fn begin_pass(&mut self) -> u8 {
        if self.next_pass == u8::MAX {
            debug!("pass indices exhausted, clearing pass grids");
            for tile in &mut self.tiles {
                tile.clear_passes();
            }
            self.next_pass = 1;
        }
        let pass = self.next_pass;
        self.next_pass += 1;
        pass
    }
}

/// Private API
impl TileStore {
    /// Returns the (tile index, row, column) addressing the given
    /// coordinate.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn locate(&self, lat: f64, lon: f64) -> Option<(usize, usize, usize)> {
        let ppd = self.config.resolution().ppd();
        let mpi = self.config.resolution().mpi() as i64;
        self.tiles.iter().enumerate().find_map(|(idx, tile)| {
            let key = tile.key();
            let x = (ppd * (lat - f64::from(key.min_north))).round_ties_even() as i64;
            let y = mpi
                - (ppd * lon_diff(f64::from(key.max_west), lon)).round_ties_even() as i64;
            ((0..=mpi).contains(&x) && (0..=mpi).contains(&y))
                .then_some((idx, x as usize, y as usize))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Region, StoreConfig, TileStore, NO_ELEVATION};
    use crate::{Site, TerrainError};
    use approx::assert_relative_eq;
    use sdf::{Resolution, SdfError, Tile, TileKey};

    fn store(capacity: usize) -> TileStore {
        TileStore::new(StoreConfig::new(capacity, Resolution::Standard).unwrap())
    }

    fn ramp(key: TileKey) -> Tile {
        Tile::from_fn(key, Resolution::Standard, |x, y| (x + y) as i16)
    }

    #[test]
    fn test_config() {
        assert!(StoreConfig::new(3, Resolution::Standard).is_err());
        let config = StoreConfig::new(16, Resolution::High).unwrap();
        assert_eq!(config.path_capacity(), 57_713);
        assert_relative_eq!(config.degree_limit(), 1.5);
    }

    #[test]
    fn test_coordinate_mapping() {
        let mut store = store(4);
        let key = TileKey::new(44, 71);
        store.insert(ramp(key)).unwrap();

        let dpp = Resolution::Standard.dpp();
        // Southeast cell.
        assert_relative_eq!(store.elevation(44.0, 71.0 + dpp), 0.0);
        // One cell north and one cell west of it.
        assert_relative_eq!(
            store.elevation(44.0 + dpp, 71.0 + 2.0 * dpp),
            3.280_84 * 2.0
        );
        // The western edge belongs to this tile, the eastern edge to
        // its neighbor.
        assert_relative_eq!(store.elevation(44.0, 72.0), 3.280_84 * 1199.0);
        assert_relative_eq!(store.elevation(44.0, 71.0), NO_ELEVATION);
        assert_relative_eq!(store.elevation(43.0, 71.5), NO_ELEVATION);
        assert!(store.try_elevation(43.0, 71.5).is_none());
    }

    #[test]
    fn test_prime_meridian_tile() {
        let mut store = store(4);
        store.insert(ramp(TileKey::new(51, 359))).unwrap();
        // Just east of Greenwich and just west of it.
        assert!(store.try_elevation(51.5, 359.5).is_some());
        assert!(store.try_elevation(51.5, 0.0).is_some());
        assert!(store.try_elevation(51.5, 0.5).is_none());
    }

    #[test]
    fn test_signal_and_mask() {
        let mut store = store(4);
        store.insert(Tile::sea_level(TileKey::new(10, 20), Resolution::Standard)).unwrap();

        assert!(store.put_signal(10.5, 20.5, 117));
        assert_eq!(store.signal(10.5, 20.5), 117);
        assert_eq!(store.signal(12.5, 20.5), 0);
        assert!(!store.put_signal(12.5, 20.5, 117));

        assert_eq!(store.or_mask(10.5, 20.5, 1), Some(1));
        assert_eq!(store.or_mask(10.5, 20.5, 8), Some(9));
        assert_eq!(store.mask(10.5, 20.5), 9);
        assert_eq!(store.put_mask(10.5, 20.5, 2), Some(2));
        assert_eq!(store.mask(10.5, 20.5), 2);
        assert_eq!(store.mask(12.5, 20.5), 0);
        assert_eq!(store.or_mask(12.5, 20.5, 1), None);

        assert!(store.put_pass(10.5, 20.5, 3));
        assert_eq!(store.pass(10.5, 20.5), 3);
    }

    #[test]
    fn test_add_elevation() {
        let mut store = store(1);
        store.insert(Tile::sea_level(TileKey::new(10, 20), Resolution::Standard)).unwrap();
        assert!(store.add_elevation(10.5, 20.5, 30.4));
        assert_relative_eq!(store.elevation(10.5, 20.5), 3.280_84 * 30.0);
        assert_eq!(store.elevation_range(), Some((0, 30)));
        assert!(!store.add_elevation(11.5, 20.5, 30.0));
    }

    #[test]
    fn test_insert() {
        let mut store = store(1);
        let key = TileKey::new(10, 20);
        assert!(store.insert(ramp(key)).unwrap());
        assert!(!store.insert(ramp(key)).unwrap());
        assert!(matches!(
            store.insert(ramp(TileKey::new(11, 20))),
            Err(TerrainError::StoreFull(_))
        ));
        assert!(matches!(
            store.insert(Tile::sea_level(key, Resolution::High)),
            Err(TerrainError::Resolution { .. })
        ));
        assert_eq!(
            store.bounds(),
            Some(Bounds {
                min_north: 10,
                max_north: 11,
                min_west: 20,
                max_west: 21
            })
        );
    }

    #[test]
    fn test_bounds_across_prime_meridian() {
        let mut store = store(4);
        store.insert(ramp(TileKey::new(51, 0))).unwrap();
        store.insert(ramp(TileKey::new(51, 359))).unwrap();
        let bounds = store.bounds().unwrap();
        assert_eq!(bounds.min_west, 359);
        assert_eq!(bounds.max_west, 1);
    }

    #[test]
    fn test_load_region() {
        let mut store = store(4);
        let loader = |key: TileKey, res: Resolution| -> Result<Option<Tile>, SdfError> {
            Ok((key.min_north == 44).then(|| Tile::from_fn(key, res, |_, _| 100)))
        };
        let region = Region {
            min_lat: 44,
            max_lat: 46,
            min_lon: 71,
            max_lon: 71,
        };
        // Three tiles requested, all fit.
        assert_eq!(store.load_region(&loader, &region).unwrap(), 3);
        assert_relative_eq!(store.elevation(44.5, 71.5), 328.084, epsilon = 1e-9);
        // Missing data becomes sea level.
        assert_relative_eq!(store.elevation(45.5, 71.5), 0.0);

        // Only one more fits; the rest are skipped.
        let wider = Region {
            min_lon: 70,
            ..region
        };
        assert_eq!(store.load_region(&loader, &wider).unwrap(), 1);
        assert!(store.is_full());
    }

    #[test]
    fn test_region_keys() {
        let region = Region {
            min_lat: 44,
            max_lat: 45,
            min_lon: 359,
            max_lon: 0,
        };
        let keys = region.keys();
        assert_eq!(
            keys,
            vec![
                TileKey::new(44, 359),
                TileKey::new(45, 359),
                TileKey::new(44, 0),
                TileKey::new(45, 0),
            ]
        );
    }

    #[test]
    fn test_region_around() {
        let config = StoreConfig::new(4, Resolution::Standard).unwrap();
        let site = Site::new(44.5, 71.5, 100.0);
        // 0.5 degrees of latitude.
        let region = Region::around(&site, 28.5, &config);
        assert_eq!(
            region,
            Region {
                min_lat: 44,
                max_lat: 45,
                min_lon: 71,
                max_lon: 72,
            }
        );

        // Far beyond what four tiles can hold.
        let clamped = Region::around(&site, 1000.0, &config);
        assert_eq!(clamped, region);

        let near_meridian = Site::new(51.2, 0.2, 100.0);
        let region = Region::around(&near_meridian, 20.0, &config);
        assert_eq!(region.min_lon, 359);
        assert_eq!(region.max_lon, 0);
    }

    #[test]
    fn test_region_union() {
        let a = Region::containing(&Site::new(44.5, 71.5, 0.0));
        let b = Region::containing(&Site::new(45.5, 70.5, 0.0));
        let union = a.union(b);
        assert_eq!(
            union,
            Region {
                min_lat: 44,
                max_lat: 45,
                min_lon: 70,
                max_lon: 71,
            }
        );

        let c = Region::containing(&Site::new(45.5, 0.5, 0.0));
        let d = Region::containing(&Site::new(45.5, 359.5, 0.0));
        let union = c.union(d);
        assert_eq!((union.min_lon, union.max_lon), (359, 0));
    }

    #[test]
    fn test_los_layers_and_passes() {
        let mut store = store(1);
        let layers: Vec<u8> = (0..6).map(|_| store.next_los_layer()).collect();
        assert_eq!(layers, [1, 8, 16, 32, 32, 32]);

        store.insert(Tile::sea_level(TileKey::new(0, 0), Resolution::Standard)).unwrap();
        assert_eq!(store.begin_pass(), 1);
        store.put_pass(0.5, 0.5, 1);
        for expected in 2..u8::MAX {
            assert_eq!(store.begin_pass(), expected);
        }
        // Exhausted; the pass grid is cleared and numbering restarts.
        assert_eq!(store.begin_pass(), 1);
        assert_eq!(store.pass(0.5, 0.5), 0);
    }
}
