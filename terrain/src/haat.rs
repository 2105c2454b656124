//! Radial terrain averaging and antenna height above average terrain.

use crate::{
    math::destination,
    Path, Site, TileStore, NO_ELEVATION,
};
use log::debug;

/// Bearings (degrees) of the radials surveyed for HAAT.
pub const HAAT_RADIALS: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Inner and outer distance (miles) of each HAAT radial.
pub const HAAT_RANGE: (f64, f64) = (2.0, 10.0);

/// Result of averaging the terrain along one radial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageTerrain {
    /// Mean ground elevation (feet), including clutter.
    Mean(f64),

    /// Every sample in range is at sea level.
    AllWater,

    /// The radial's far end lies outside the resident tiles.
    MissingData,
}

impl AverageTerrain {
    pub fn mean(&self) -> Option<f64> {
        match self {
            Self::Mean(mean) => Some(*mean),
            _ => None,
        }
    }
}

/// Averages the terrain along the bearing `azimuth` (degrees) from
/// `site`, between `start` and `end` miles out.
///
/// Sea-level samples at the far end of the radial are dropped before
/// averaging. `clutter` (feet) is added to every sample that is not
/// at sea level.
pub fn average_terrain(
    store: &TileStore,
    site: &Site,
    azimuth: f64,
    start: f64,
    end: f64,
    clutter: f64,
) -> AverageTerrain {
    let far = destination(site, azimuth, end);
    if store.elevation(far.lat, far.lon) <= NO_ELEVATION + 1.0 {
        return AverageTerrain::MissingData;
    }

    let path = Path::new(store, site, &far);
    let samples = path.samples();
    let land = samples
        .iter()
        .rposition(|sample| sample.elevation != 0.0)
        .map_or(0, |idx| idx + 1);

    let (sum, count) = samples[..land]
        .iter()
        .filter(|sample| sample.distance >= start)
        .fold((0.0, 0_u32), |(sum, count), sample| {
            let height = if sample.elevation == 0.0 {
                0.0
            } else {
                sample.elevation + clutter
            };
            (sum + height, count + 1)
        });

    if count == 0 {
        AverageTerrain::AllWater
    } else {
        AverageTerrain::Mean(sum / f64::from(count))
    }
}

/// Per-radial terrain averages and the resulting HAAT of one site.
#[derive(Debug, Clone, PartialEq)]
pub struct HaatSurvey {
    /// `(azimuth, average)` for each surveyed radial.
    pub radials: Vec<(f64, AverageTerrain)>,

    /// Height above average terrain (feet), `None` if any radial
    /// lacked terrain data.
    pub haat: Option<f64>,
}

/// Surveys the eight HAAT radials around `site`.
pub fn haat_survey(store: &TileStore, site: &Site, clutter: f64) -> HaatSurvey {
    let (start, end) = HAAT_RANGE;
    let radials: Vec<(f64, AverageTerrain)> = HAAT_RADIALS
        .iter()
        .map(|&az| (az, average_terrain(store, site, az, start, end, clutter)))
        .collect();

    let haat = if radials
        .iter()
        .any(|(_, avg)| *avg == AverageTerrain::MissingData)
    {
        debug!("terrain data missing around {}", site.name);
        None
    } else {
        let (sum, count) = radials
            .iter()
            .filter_map(|(_, avg)| avg.mean())
            .fold((0.0, 0_u32), |(sum, count), mean| (sum + mean, count + 1));
        // An antenna surrounded by water is measured from sea level.
        let average = if count == 0 { 0.0 } else { sum / f64::from(count) };
        Some(site.alt + store.elevation(site.lat, site.lon) - average)
    };

    HaatSurvey { radials, haat }
}

/// Returns the antenna height (feet) of `site` above the average
/// terrain 2 to 10 miles out, or `None` if the resident tiles don't
/// cover the survey.
pub fn height_above_average_terrain(store: &TileStore, site: &Site, clutter: f64) -> Option<f64> {
    haat_survey(store, site, clutter).haat
}
