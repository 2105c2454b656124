//! SPLAT Data File (`.sdf`) elevation pages.
//!
//! A [Tile] covers one degree of latitude by one degree of longitude
//! and carries, besides elevation, the per-cell annotation mask,
//! signal byte, and sweep pass marker that coverage and path loss
//! analyses accumulate into.
//!
//! Longitudes follow the SDF convention: degrees _west_, in the
//! range `[0, 360)`.
//!
//! # References
//!
//! 1. [SPLAT! documentation](https://www.qsl.net/kd2bd/splat.html)
//! 1. [HGT file layout](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)

mod codec;
mod error;
mod hgt;
mod loader;

pub use crate::{
    codec::{read_sdf, write_sdf},
    error::SdfError,
    hgt::read_hgt,
    loader::{DirLoader, TileLoader},
};
use std::{fmt, str::FromStr};

/// Sample density of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 3 arc-second data, 1200 pixels per degree.
    Standard,

    /// 1 arc-second data, 3600 pixels per degree.
    High,
}

impl Resolution {
    /// Integer pixels per degree.
    pub const fn ippd(self) -> usize {
        match self {
            Self::Standard => 1200,
            Self::High => 3600,
        }
    }

    /// Pixels per degree.
    #[allow(clippy::cast_precision_loss)]
    pub fn ppd(self) -> f64 {
        self.ippd() as f64
    }

    /// Degrees per pixel.
    pub fn dpp(self) -> f64 {
        1.0 / self.ppd()
    }

    /// Maximum pixel index along either tile axis.
    pub const fn mpi(self) -> usize {
        self.ippd() - 1
    }

    /// Path sampling density along a great circle.
    pub const fn samples_per_radian(self) -> f64 {
        match self {
            Self::Standard => 68_755.0,
            Self::High => 206_265.0,
        }
    }

    /// Side length of the matching SRTM `.hgt` grid (includes the
    /// overlapping north and east edges).
    pub const fn hgt_side(self) -> usize {
        self.ippd() + 1
    }

    /// Arcseconds per sample.
    pub const fn arcseconds(self) -> u8 {
        match self {
            Self::Standard => 3,
            Self::High => 1,
        }
    }
}

/// Integer degree bounds of a tile.
///
/// `max_west` may be numerically smaller than `min_west` for the
/// page straddling the prime meridian (`359:0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub min_north: i32,
    pub max_north: i32,
    pub min_west: i32,
    pub max_west: i32,
}

impl TileKey {
    /// Returns the key of the page whose southeast corner is
    /// (`min_north`, `min_west`).
    pub fn new(min_north: i32, min_west: i32) -> Self {
        let min_west = min_west.rem_euclid(360);
        Self {
            min_north,
            max_north: min_north + 1,
            min_west,
            max_west: (min_west + 1).rem_euclid(360),
        }
    }

    /// Returns the key containing the given coordinate (degrees
    /// north, degrees west).
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(lat: f64, lon_west: f64) -> Self {
        Self::new(lat.floor() as i32, lon_west.floor() as i32)
    }

    /// Returns the SDF file stem, e.g. `44:45:71:72` or
    /// `44:45:71:72-hd`.
    pub fn file_stem(&self, resolution: Resolution) -> String {
        match resolution {
            Resolution::Standard => self.to_string(),
            Resolution::High => format!("{self}-hd"),
        }
    }

    /// Returns the SRTM file name covering the same area, e.g.
    /// `N44W072.hgt`.
    pub fn hgt_name(&self) -> String {
        let (n_s, lat) = if self.min_north < 0 {
            ('S', -self.min_north)
        } else {
            ('N', self.min_north)
        };
        // The SW corner in degrees east is -(min_west + 1).
        let west_edge = self.min_west + 1;
        let (e_w, lon) = if west_edge <= 180 {
            ('W', west_edge)
        } else {
            ('E', 360 - west_edge)
        };
        format!("{n_s}{lat:02}{e_w}{lon:03}.hgt")
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.min_north, self.max_north, self.min_west, self.max_west
        )
    }
}

impl FromStr for TileKey {
    type Err = SdfError;

    fn from_str(s: &str) -> Result<Self, SdfError> {
        let stem = s.strip_suffix("-hd").unwrap_or(s);
        let mut fields = stem.split(':').map(str::parse::<i32>);
        let mut next = || {
            fields
                .next()
                .and_then(Result::ok)
                .ok_or_else(|| SdfError::Key(s.to_owned()))
        };
        let key = Self {
            min_north: next()?,
            max_north: next()?,
            min_west: next()?,
            max_west: next()?,
        };
        Ok(key)
    }
}

/// One page of elevation data plus the analysis grids layered on top
/// of it.
///
/// Cell `(x, y)` addresses row `x` counting north from `min_north`
/// and column `y`, where `y = ippd - 1` lies on the western edge and
/// `y` decreases eastward.
#[derive(Clone)]
pub struct Tile {
    key: TileKey,
    resolution: Resolution,

    /// Lowest elevation sample in this tile (meters).
    min_elevation: i16,

    /// Highest elevation sample in this tile (meters).
    max_elevation: i16,

    /// Elevation samples (meters).
    data: Box<[i16]>,

    /// Annotation and line-of-sight bits.
    mask: Box<[u8]>,

    /// Encoded signal level.
    signal: Box<[u8]>,

    /// Index of the last loss sweep pass which processed the cell.
    pass: Box<[u8]>,
}

impl Tile {
    /// Returns a tile built from `samples` in `(x, y)` row-major
    /// order.
    pub fn from_samples(
        key: TileKey,
        resolution: Resolution,
        samples: Vec<i16>,
    ) -> Result<Self, SdfError> {
        let len = resolution.ippd() * resolution.ippd();
        if samples.len() != len {
            return Err(SdfError::SampleCount {
                expected: len,
                found: samples.len(),
            });
        }
        Ok(Self::with_samples(key, resolution, samples))
    }

    /// Returns a tile whose elevation is computed per cell.
    pub fn from_fn<F>(key: TileKey, resolution: Resolution, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i16,
    {
        let ippd = resolution.ippd();
        let mut samples = Vec::with_capacity(ippd * ippd);
        for x in 0..ippd {
            for y in 0..ippd {
                samples.push(f(x, y));
            }
        }
        Self::with_samples(key, resolution, samples)
    }

    /// Returns an all sea-level tile, used in lieu of missing data.
    pub fn sea_level(key: TileKey, resolution: Resolution) -> Self {
        Self::from_fn(key, resolution, |_, _| 0)
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn ippd(&self) -> usize {
        self.resolution.ippd()
    }

    /// Returns the lowest elevation sample in this tile.
    pub fn min_elevation(&self) -> i16 {
        self.min_elevation
    }

    /// Returns the highest elevation sample in this tile.
    pub fn max_elevation(&self) -> i16 {
        self.max_elevation
    }

    /// Returns the elevation (meters) of cell `(x, y)`.
    pub fn elevation_at(&self, x: usize, y: usize) -> i16 {
        self.data[self.index(x, y)]
    }

    /// Adds `meters` to cell `(x, y)`, saturating at the `i16`
    /// limits.
    pub fn add_elevation_at(&mut self, x: usize, y: usize, meters: i16) {
        let idx = self.index(x, y);
        let elevation = self.data[idx].saturating_add(meters);
        self.data[idx] = elevation;
        self.min_elevation = self.min_elevation.min(elevation);
        self.max_elevation = self.max_elevation.max(elevation);
    }

    pub fn mask_at(&self, x: usize, y: usize) -> u8 {
        self.mask[self.index(x, y)]
    }

    pub fn set_mask_at(&mut self, x: usize, y: usize, value: u8) {
        let idx = self.index(x, y);
        self.mask[idx] = value;
    }

    pub fn signal_at(&self, x: usize, y: usize) -> u8 {
        self.signal[self.index(x, y)]
    }

    pub fn set_signal_at(&mut self, x: usize, y: usize, value: u8) {
        let idx = self.index(x, y);
        self.signal[idx] = value;
    }

    pub fn pass_at(&self, x: usize, y: usize) -> u8 {
        self.pass[self.index(x, y)]
    }

    pub fn set_pass_at(&mut self, x: usize, y: usize, value: u8) {
        let idx = self.index(x, y);
        self.pass[idx] = value;
    }

    /// Forgets which sweep passes have visited this tile.
    pub fn clear_passes(&mut self) {
        self.pass.fill(0);
    }

    /// Raw elevation grid in `(x, y)` row-major order.
    pub fn elevations(&self) -> &[i16] {
        &self.data
    }

    /// Raw signal grid in `(x, y)` row-major order.
    pub fn signals(&self) -> &[u8] {
        &self.signal
    }

    /// Raw mask grid in `(x, y)` row-major order.
    pub fn masks(&self) -> &[u8] {
        &self.mask
    }
}

/// Private API
impl Tile {
    fn with_samples(key: TileKey, resolution: Resolution, samples: Vec<i16>) -> Self {
        let len = samples.len();
        let min_elevation = samples.iter().min().copied().unwrap_or(0);
        let max_elevation = samples.iter().max().copied().unwrap_or(0);
        Self {
            key,
            resolution,
            min_elevation,
            max_elevation,
            data: samples.into_boxed_slice(),
            mask: vec![0; len].into_boxed_slice(),
            signal: vec![0; len].into_boxed_slice(),
            pass: vec![0; len].into_boxed_slice(),
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.ippd() && y < self.ippd());
        x * self.ippd() + y
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("key", &self.key)
            .field("resolution", &self.resolution)
            .field("min_elevation", &self.min_elevation)
            .field("max_elevation", &self.max_elevation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Resolution, Tile, TileKey};

    #[test]
    fn test_key_wraps_prime_meridian() {
        let key = TileKey::new(51, 359);
        assert_eq!(key.max_west, 0);
        assert_eq!(key.to_string(), "51:52:359:0");
        assert_eq!(TileKey::new(51, -1), key);
    }

    #[test]
    fn test_key_parse() {
        let key: TileKey = "44:45:71:72-hd".parse().unwrap();
        assert_eq!(key, TileKey::new(44, 71));
        assert_eq!(key.file_stem(Resolution::High), "44:45:71:72-hd");
        assert!("44:45:71".parse::<TileKey>().is_err());
        assert!("44:45:x:72".parse::<TileKey>().is_err());
    }

    #[test]
    fn test_hgt_name() {
        assert_eq!(TileKey::new(44, 71).hgt_name(), "N44W072.hgt");
        assert_eq!(TileKey::new(51, 359).hgt_name(), "N51E000.hgt");
        assert_eq!(TileKey::new(-34, 208).hgt_name(), "S34E151.hgt");
        assert_eq!(TileKey::new(0, 179).hgt_name(), "N00W180.hgt");
    }

    #[test]
    fn test_containing() {
        assert_eq!(TileKey::containing(44.27, 71.30), TileKey::new(44, 71));
        assert_eq!(TileKey::containing(-0.5, 359.5), TileKey::new(-1, 359));
    }

    #[test]
    fn test_tile_grids() {
        let key = TileKey::new(10, 20);
        let mut tile = Tile::from_fn(key, Resolution::Standard, |x, y| (x + y) as i16);
        assert_eq!(tile.elevation_at(3, 4), 7);
        assert_eq!(tile.min_elevation(), 0);
        assert_eq!(tile.max_elevation(), 2 * 1199);

        tile.add_elevation_at(0, 0, -5);
        assert_eq!(tile.elevation_at(0, 0), -5);
        assert_eq!(tile.min_elevation(), -5);

        tile.set_mask_at(1, 2, 9);
        tile.set_signal_at(1, 2, 120);
        tile.set_pass_at(1, 2, 3);
        assert_eq!(tile.mask_at(1, 2), 9);
        assert_eq!(tile.signal_at(1, 2), 120);
        assert_eq!(tile.pass_at(1, 2), 3);
        tile.clear_passes();
        assert_eq!(tile.pass_at(1, 2), 0);
    }

    #[test]
    fn test_sample_count_checked() {
        let key = TileKey::new(0, 0);
        assert!(Tile::from_samples(key, Resolution::Standard, vec![0; 10]).is_err());
    }
}
