//! Tile loading from disk.

use crate::{codec::read_sdf, hgt::read_hgt, Resolution, SdfError, Tile, TileKey};
use log::debug;
use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};

/// Source of elevation tiles.
///
/// `Ok(None)` means no data exists for `key`; callers conventionally
/// substitute a sea-level tile.
pub trait TileLoader {
    fn load(&self, key: TileKey, resolution: Resolution) -> Result<Option<Tile>, SdfError>;
}

impl<F> TileLoader for F
where
    F: Fn(TileKey, Resolution) -> Result<Option<Tile>, SdfError>,
{
    fn load(&self, key: TileKey, resolution: Resolution) -> Result<Option<Tile>, SdfError> {
        self(key, resolution)
    }
}

/// Loads tiles from a directory of `.sdf` files, falling back to
/// SRTM `.hgt` files of the same area.
#[derive(Debug, Clone)]
pub struct DirLoader {
    /// Directory containing SDF and/or HGT tile files.
    tile_dir: PathBuf,
}

impl DirLoader {
    pub fn new(tile_dir: PathBuf) -> Self {
        Self { tile_dir }
    }

    pub fn tile_dir(&self) -> &Path {
        &self.tile_dir
    }
}

impl TileLoader for DirLoader {
    fn load(&self, key: TileKey, resolution: Resolution) -> Result<Option<Tile>, SdfError> {
        let sdf_path = self
            .tile_dir
            .join(format!("{}.sdf", key.file_stem(resolution)));
        match File::open(&sdf_path) {
            Ok(file) => {
                debug!("loading {sdf_path:?}");
                return read_sdf(BufReader::new(file), resolution).map(Some);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => return Err(e.into()),
        }

        let hgt_path = {
            let file_name = key.hgt_name();
            let mut hgt_path = self.tile_dir.join(&file_name);
            if !hgt_path.exists() {
                hgt_path = self.tile_dir.join(file_name.to_lowercase());
            }
            hgt_path
        };
        if !hgt_path.exists() {
            debug!("no tile data for {key}");
            return Ok(None);
        }

        debug!("loading {hgt_path:?}");
        let tile = read_hgt(&hgt_path)?;
        if tile.resolution() != resolution {
            return Err(SdfError::Resolution {
                path: hgt_path,
                expected: resolution,
                found: tile.resolution(),
            });
        }
        Ok(Some(tile))
    }
}

#[cfg(test)]
mod tests {
    use super::{DirLoader, TileLoader};
    use crate::{write_sdf, Resolution, SdfError, Tile, TileKey};
    use std::fs::File;

    #[test]
    fn test_missing_tile_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirLoader::new(dir.path().to_owned());
        let tile = loader
            .load(TileKey::new(44, 71), Resolution::Standard)
            .unwrap();
        assert!(tile.is_none());
    }

    #[test]
    fn test_load_sdf() {
        let dir = tempfile::tempdir().unwrap();
        let key = TileKey::new(44, 71);
        let tile = Tile::from_fn(key, Resolution::Standard, |x, _| x as i16);
        let path = dir.path().join("44:45:71:72.sdf");
        write_sdf(&tile, File::create(path).unwrap()).unwrap();

        let loader = DirLoader::new(dir.path().to_owned());
        let loaded = loader.load(key, Resolution::Standard).unwrap().unwrap();
        assert_eq!(loaded.key(), key);
        assert_eq!(loaded.elevation_at(17, 3), 17);

        // High resolution pages use a distinct name.
        assert!(loader.load(key, Resolution::High).unwrap().is_none());
    }

    #[test]
    fn test_closure_loader() {
        let loader = |key: TileKey, res: Resolution| -> Result<Option<Tile>, SdfError> {
            Ok(Some(Tile::sea_level(key, res)))
        };
        let tile = loader
            .load(TileKey::new(1, 2), Resolution::Standard)
            .unwrap()
            .unwrap();
        assert_eq!(tile.key(), TileKey::new(1, 2));
    }
}
