//! SRTM / NASADEM `.hgt` conversion.
//!
//! HGT files are big-endian `i16` grids, north row first, which
//! include the overlapping northern and eastern edges. Converting to a
//! [Tile] drops those edges and flips both axes into SDF order.

use crate::{Resolution, SdfError, Tile, TileKey};
use byteorder::{BigEndian as BE, ReadBytesExt};
use log::debug;
use memmap2::Mmap;
use std::{fs::File, mem::size_of, path::Path};

/// Marker for missing samples in SRTM data.
const HGT_VOID: i16 = -32768;

/// Reads the `.hgt` file at `path` into an SDF tile.
pub fn read_hgt<P: AsRef<Path>>(path: P) -> Result<Tile, SdfError> {
    let resolution = extract_resolution(&path)?;
    let key = parse_key(&path)?;
    let side = resolution.hgt_side();

    let raw = {
        let file = File::open(&path)?;
        // SAFETY: the mapping is only read, and dropped before
        // returning.
        let mmap = unsafe { Mmap::map(&file)? };
        let mut rdr = &mmap[..];
        let mut raw = Vec::with_capacity(side * side);
        for _ in 0..(side * side) {
            raw.push(rdr.read_i16::<BE>()?);
        }
        raw
    };

    let mut grid = raw;
    let voids = fill_voids(&mut grid, side);
    if voids > 0 {
        debug!("{:?}: filled {voids} void samples", path.as_ref());
    }

    let ippd = resolution.ippd();
    let tile = Tile::from_fn(key, resolution, |x, y| {
        // Row 0 of the HGT grid is the northern edge, column 0 the
        // western edge.
        let row = ippd - x;
        let col = (ippd - 1) - y;
        grid[row * side + col]
    });
    Ok(tile)
}

/// Replaces each void with the mean of its valid 8-neighbors, or sea
/// level when none are valid. Returns the number of voids replaced.
fn fill_voids(grid: &mut [i16], side: usize) -> usize {
    let voids: Vec<usize> = grid
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == HGT_VOID)
        .map(|(idx, _)| idx)
        .collect();
    for &idx in &voids {
        let (row, col) = (idx / side, idx % side);
        let mut sum = 0_i32;
        let mut count = 0_i32;
        for dr in -1_isize..=1 {
            for dc in -1_isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (r, c) = (row as isize + dr, col as isize + dc);
                #[allow(clippy::cast_possible_wrap)]
                if r < 0 || c < 0 || r >= side as isize || c >= side as isize {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let neighbor = grid[r as usize * side + c as usize];
                if neighbor != HGT_VOID {
                    sum += i32::from(neighbor);
                    count += 1;
                }
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let fill = if count == 0 { 0 } else { (sum / count) as i16 };
        grid[idx] = fill;
    }
    voids.len()
}

fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<Resolution, SdfError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok(Resolution::High),
        RES_3_ARCSECONDS_FILE_LEN => Ok(Resolution::Standard),
        invalid_len => Err(SdfError::HgtLen(invalid_len, path.as_ref().to_owned())),
    }
}

/// Parses the tile key out of an SRTM name such as `N44W072.hgt`.
fn parse_key<P: AsRef<Path>>(path: P) -> Result<TileKey, SdfError> {
    let mk_err = || SdfError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?
        .to_uppercase();
    if name.len() != 7 || !name.is_ascii() {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" => 1,
        "S" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i32>().map_err(|_| mk_err())?;
    let lon_east = match &name[3..4] {
        "E" => 1,
        "W" => -1,
        _ => return Err(mk_err()),
    } * name[4..7].parse::<i32>().map_err(|_| mk_err())?;
    // The SW corner's west longitude is the page's max_west.
    let max_west = (-lon_east).rem_euclid(360);
    Ok(TileKey::new(lat, max_west - 1))
}
