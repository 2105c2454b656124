//! Antenna pattern (.az and .el) files.
//!
//! An azimuth file starts with the pattern's rotation, an elevation
//! file with its mechanical tilt and tilt azimuth. Every following
//! line holds an angle and a normalized amplitude. `;` starts a
//! comment.

use anyhow::{Context, Result};
use log::{debug, info};
use propah::{
    antenna::{AzimuthPattern, ElevationPattern},
    AntennaPattern,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Splits `rdr` into comment-free lines of whitespace separated
/// numbers. Lines with no leading number read as empty.
fn numeric_lines<R: BufRead>(rdr: R) -> Result<Vec<Vec<f64>>> {
    rdr.lines()
        .map(|line| -> Result<Vec<f64>> {
            let line = line?;
            let data = line.split(';').next().unwrap_or_default();
            Ok(data
                .split_whitespace()
                .map_while(|field| field.parse().ok())
                .collect())
        })
        .collect()
}

/// Turns `(angle, amplitude)` lines into samples, skipping any line
/// without both.
fn samples(lines: &[Vec<f64>]) -> Vec<(f64, f64)> {
    lines
        .iter()
        .filter_map(|line| match line[..] {
            [angle, amplitude, ..] => Some((angle, amplitude)),
            _ => None,
        })
        .collect()
}

pub fn parse_azimuth<R: BufRead>(rdr: R) -> Result<AzimuthPattern> {
    let lines = numeric_lines(rdr)?;
    let Some((header, body)) = lines.split_first() else {
        return Ok(AzimuthPattern::default());
    };
    Ok(AzimuthPattern {
        rotation: header.first().copied().unwrap_or(0.0),
        samples: samples(body),
    })
}

pub fn parse_elevation<R: BufRead>(rdr: R) -> Result<ElevationPattern> {
    let lines = numeric_lines(rdr)?;
    let Some((header, body)) = lines.split_first() else {
        return Ok(ElevationPattern::default());
    };
    Ok(ElevationPattern {
        tilt: header.first().copied().unwrap_or(0.0),
        tilt_azimuth: header.get(1).copied().unwrap_or(0.0),
        samples: samples(body),
    })
}

/// Loads the `.az` and `.el` files sharing `site_file`'s stem, if
/// either exists.
pub fn load_pattern(site_file: &Path) -> Result<Option<AntennaPattern>> {
    let open = |extension: &str| -> Result<Option<BufReader<File>>> {
        let path = site_file.with_extension(extension);
        if !path.exists() {
            debug!("no {path:?}");
            return Ok(None);
        }
        info!("antenna pattern from {path:?}");
        let file = File::open(&path).with_context(|| format!("opening {path:?}"))?;
        Ok(Some(BufReader::new(file)))
    };

    let mut builder = AntennaPattern::builder();
    let mut found = false;
    if let Some(rdr) = open("az")? {
        builder = builder.azimuth(parse_azimuth(rdr)?);
        found = true;
    }
    if let Some(rdr) = open("el")? {
        builder = builder.elevation(parse_elevation(rdr)?);
        found = true;
    }
    if found {
        Ok(Some(builder.build()?))
    } else {
        Ok(None)
    }
}
