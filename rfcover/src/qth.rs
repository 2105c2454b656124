//! Site location (.qth) files.
//!
//! Four lines: site name, latitude, longitude (degrees west), and
//! antenna height. Bearings are decimal degrees or "degrees minutes
//! seconds". Heights are feet unless marked with an `m`.

use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use terrain::{constants::FEET_PER_METER, Site};

/// Parses a bearing in decimal (`40.139722`) or degree, minute,
/// second (`40 08 23.5`) form. Anything unreadable, or beyond a full
/// turn, reads as 0.
pub fn read_bearing(input: &str) -> f64 {
    let fields: Vec<&str> = input.split_whitespace().collect();
    let bearing = match fields[..] {
        [decimal] => decimal.parse().unwrap_or(0.0),
        [degrees, minutes, seconds] => {
            match (
                degrees.parse::<i32>(),
                minutes.parse::<i32>(),
                seconds.parse::<f64>(),
            ) {
                (Ok(d), Ok(m), Ok(s)) => {
                    let bearing = f64::from(d.abs()) + f64::from(m.abs()) / 60.0 + s.abs() / 3600.0;
                    if d < 0 || m < 0 || s < 0.0 {
                        -bearing
                    } else {
                        bearing
                    }
                }
                _ => 0.0,
            }
        }
        _ => 0.0,
    };
    if (-360.0..=360.0).contains(&bearing) {
        bearing
    } else {
        0.0
    }
}

/// Parses a height in feet, or in meters when followed by `m`/`M`
/// (`"30"`, `"12.5 meters"`), returning feet.
pub fn read_height(input: &str) -> Result<f64> {
    let (number, meters) = match input.find(|c: char| c == 'm' || c == 'M') {
        Some(idx) => (&input[..idx], true),
        None => (input, false),
    };
    let value: f64 = number
        .split_whitespace()
        .next()
        .ok_or_else(|| anyhow!("missing height"))?
        .parse()
        .with_context(|| format!("invalid height {input:?}"))?;
    Ok(if meters { value * FEET_PER_METER } else { value })
}

/// Parses a site from `rdr`.
pub fn parse_qth<R: BufRead>(rdr: R) -> Result<Site> {
    let mut lines = rdr.lines();
    let mut next = |what: &str| -> Result<String> {
        lines
            .next()
            .transpose()?
            .ok_or_else(|| anyhow!("missing {what}"))
    };
    let name = next("site name")?;
    let lat = read_bearing(&next("latitude")?);
    let lon = read_bearing(&next("longitude")?);
    let alt = read_height(&next("antenna height")?)?;
    Ok(Site::new(lat, lon, alt).with_name(name.trim_end()))
}

/// Loads the site file at `path`, adding a `.qth` extension if it has
/// none.
pub fn load_qth(path: &Path) -> Result<Site> {
    let path = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("qth")
    };
    let file = File::open(&path).with_context(|| format!("opening {path:?}"))?;
    let site = parse_qth(BufReader::new(file)).with_context(|| format!("reading {path:?}"))?;
    Ok(site.with_filename(path))
}
