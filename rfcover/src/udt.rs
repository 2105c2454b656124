//! User-defined terrain (.udt) files.
//!
//! One `latitude, longitude, height` feature per line. Heights are
//! feet unless marked with an `m`.

use crate::qth::read_bearing;
use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use terrain::{constants::METERS_PER_FOOT, udt::TerrainFeature};

pub fn parse_udt<R: BufRead>(rdr: R) -> Result<Vec<TerrainFeature>> {
    let mut features = Vec::new();
    for (line_no, line) in rdr.lines().enumerate() {
        let line = line?;
        let data = line.split(';').next().unwrap_or_default().trim();
        if data.is_empty() {
            continue;
        }
        let fields: Vec<&str> = data.split(',').collect();
        let [lat, lon, height] = fields[..] else {
            return Err(anyhow!("line {}: expected latitude, longitude, height", line_no + 1));
        };
        features.push(TerrainFeature {
            lat: read_bearing(lat),
            lon: read_bearing(lon).rem_euclid(360.0),
            height: read_meters(height).with_context(|| format!("line {}", line_no + 1))?,
        });
    }
    Ok(features)
}

/// Parses a height in meters when followed by `m`/`M`, feet otherwise,
/// returning meters.
fn read_meters(input: &str) -> Result<f64> {
    let (number, meters) = match input.find(|c: char| c == 'm' || c == 'M') {
        Some(idx) => (&input[..idx], true),
        None => (input, false),
    };
    let value: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid height {input:?}"))?;
    Ok(if meters { value } else { value * METERS_PER_FOOT })
}

pub fn load_udt(path: &Path) -> Result<Vec<TerrainFeature>> {
    let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
    parse_udt(BufReader::new(file)).with_context(|| format!("reading {path:?}"))
}
