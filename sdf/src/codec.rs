//! Plain text SDF codec.
//!
//! An SDF file is four header lines (`max_west`, `min_north`,
//! `min_west`, `max_north`) followed by `ippd * ippd` elevation
//! samples in meters, one per line, in `(x, y)` row-major order.

use crate::{Resolution, SdfError, Tile, TileKey};
use std::io::{BufRead, Write};

/// Parses an SDF tile from `rdr`.
pub fn read_sdf<R: BufRead>(rdr: R, resolution: Resolution) -> Result<Tile, SdfError> {
    let mut lines = rdr.lines().enumerate();

    let mut header = [0_i32; 4];
    for field in &mut header {
        let (line_no, line) = lines.next().ok_or(SdfError::Header(0))?;
        *field = line?
            .trim()
            .parse()
            .map_err(|_| SdfError::Header(line_no + 1))?;
    }
    let [max_west, min_north, min_west, max_north] = header;
    let key = TileKey {
        min_north,
        max_north,
        min_west,
        max_west,
    };

    let len = resolution.ippd() * resolution.ippd();
    let mut samples = Vec::with_capacity(len);
    for (line_no, line) in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if samples.len() == len {
            break;
        }
        let sample = line
            .parse::<i32>()
            .map_err(|_| SdfError::Sample(line_no + 1))?;
        #[allow(clippy::cast_possible_truncation)]
        samples.push(sample.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
    }

    Tile::from_samples(key, resolution, samples)
}

/// Writes `tile`'s elevation grid to `wtr` in SDF format.
pub fn write_sdf<W: Write>(tile: &Tile, mut wtr: W) -> Result<(), SdfError> {
    let TileKey {
        min_north,
        max_north,
        min_west,
        max_west,
    } = tile.key();
    writeln!(wtr, "{max_west}\n{min_north}\n{min_west}\n{max_north}")?;
    for sample in tile.elevations() {
        writeln!(wtr, "{sample}")?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_sdf, write_sdf};
    use crate::{Resolution, SdfError, Tile, TileKey};
    use std::io::Cursor;

    #[test]
    fn test_sdf_roundtrip() {
        let key = TileKey::new(40, 75);
        let tile = Tile::from_fn(key, Resolution::Standard, |x, y| (x as i16) - (y as i16));
        let mut buf = Vec::new();
        write_sdf(&tile, &mut buf).unwrap();

        let parsed = read_sdf(Cursor::new(buf), Resolution::Standard).unwrap();
        assert_eq!(parsed.key(), key);
        assert_eq!(parsed.elevations(), tile.elevations());
        assert_eq!(parsed.max_elevation(), 1199);
        assert_eq!(parsed.min_elevation(), -1199);
    }

    #[test]
    fn test_header_order() {
        let key = TileKey::new(40, 75);
        let tile = Tile::sea_level(key, Resolution::Standard);
        let mut buf = Vec::new();
        write_sdf(&tile, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header: Vec<&str> = text.lines().take(4).collect();
        assert_eq!(header, ["76", "40", "75", "41"]);
    }

    #[test]
    fn test_truncated_sdf() {
        let text = "76\n40\n75\n41\n1\n2\n3\n";
        let err = read_sdf(Cursor::new(text), Resolution::Standard).unwrap_err();
        assert!(matches!(
            err,
            SdfError::SampleCount {
                expected: 1_440_000,
                found: 3
            }
        ));
    }

    #[test]
    fn test_bad_header() {
        let text = "76\nforty\n75\n41\n";
        let err = read_sdf(Cursor::new(text), Resolution::Standard).unwrap_err();
        assert!(matches!(err, SdfError::Header(2)));
    }
}
