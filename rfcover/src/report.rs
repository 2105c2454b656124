//! The `report` command: site, path, and obstruction reports.

use crate::{lrp::load_lrp, options::Report, plan::load_study, qth::load_qth};
use anyhow::Result;
use propah::{
    los::first_obstruction,
    obstruction::{obstruction_analysis, Clearance, ClearanceSearch, ObstructionConfig},
    FreeSpace,
};
use serde::Serialize;
use std::fmt;
use terrain::{
    constants::EARTH_RADIUS_FEET,
    haat::{haat_survey, AverageTerrain, HAAT_RANGE},
    math::{azimuth, distance, elevation_angle},
    Site, TileStore,
};

#[derive(Debug, Serialize)]
struct SiteReport {
    name: String,
    lat: f64,

    /// Degrees west.
    lon: f64,

    /// Ground elevation (feet AMSL), if the site is on resident
    /// terrain.
    ground: Option<f64>,

    /// Antenna height above ground (feet).
    agl: f64,
    radials: Vec<Radial>,
    haat: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Radial {
    azimuth: f64,

    /// Average terrain (feet AMSL), absent when the radial is all
    /// water or runs off the terrain.
    average: Option<f64>,
    all_water: bool,
}

#[derive(Debug, Serialize)]
struct ObstructionRow {
    lat: f64,
    lon: f64,

    /// Miles from the receiver.
    distance: f64,

    /// Feet AMSL.
    elevation: f64,
}

#[derive(Debug, Serialize)]
struct FresnelRow {
    /// Antenna height (feet AGL) clearing the first Fresnel zone, if
    /// the receiver must be raised.
    full: Option<f64>,
    partial: Option<f64>,
    fraction: f64,
}

#[derive(Debug, Serialize)]
struct PathReport {
    /// Miles.
    distance: f64,
    azimuth_to_rx: f64,
    azimuth_to_tx: f64,

    /// Degrees above the transmitter's horizontal.
    elevation_to_rx: f64,
    elevation_to_tx: f64,

    /// Angle to the first obstruction seen from the transmitter,
    /// when terrain is in the way.
    obstruction_angle: Option<f64>,

    /// dB, given a frequency.
    free_space_loss: Option<f64>,
    obstructions: Vec<ObstructionRow>,

    /// Receive antenna height (feet AGL) for a clear line of sight,
    /// when the current height is not enough.
    line_of_sight: Option<f64>,
    fresnel: Option<FresnelRow>,
}

#[derive(Debug, Serialize)]
struct StudyReport {
    frequency: Option<f64>,
    sites: Vec<SiteReport>,
    path: Option<PathReport>,
}

fn raise_to(clearance: Clearance) -> Option<f64> {
    match clearance {
        Clearance::Clear => None,
        Clearance::RaiseTo(height) => Some(height),
    }
}

fn site_report(store: &TileStore, site: &Site, clutter: f64) -> SiteReport {
    let survey = haat_survey(store, site, clutter);
    SiteReport {
        name: site.name.clone(),
        lat: site.lat,
        lon: site.lon,
        ground: store.try_elevation(site.lat, site.lon),
        agl: site.alt,
        radials: survey
            .radials
            .iter()
            .map(|&(azimuth, average)| Radial {
                azimuth,
                average: average.mean(),
                all_water: average == AverageTerrain::AllWater,
            })
            .collect(),
        haat: survey.haat,
    }
}

impl Report {
    fn obstruction_config(&self) -> ObstructionConfig {
        ObstructionConfig {
            clutter: self.terrain.feet(self.clutter),
            earth_radius: EARTH_RADIUS_FEET * self.earth_radius_multiplier,
            fresnel_fraction: self.fresnel_fraction,
            search: if self.bisect {
                ClearanceSearch::Bisect
            } else {
                ClearanceSearch::Linear
            },
        }
    }

    fn frequency(&self) -> Result<Option<f64>> {
        let frequency = match (self.frequency, &self.lrp) {
            (Some(mhz), _) => Some(mhz),
            (None, Some(path)) => Some(load_lrp(path)?.frequency),
            (None, None) => None,
        };
        Ok(frequency.filter(|mhz| *mhz > 0.0))
    }

    fn path_report(
        &self,
        store: &TileStore,
        tx: &Site,
        rx: &Site,
        frequency: Option<f64>,
    ) -> PathReport {
        let config = self.obstruction_config();
        let miles = distance(tx, rx);
        let seen = first_obstruction(store, tx, rx, config.earth_radius, config.clutter);
        let analysis = obstruction_analysis(store, tx, rx, frequency, &config);
        PathReport {
            distance: miles,
            azimuth_to_rx: azimuth(tx, rx),
            azimuth_to_tx: azimuth(rx, tx),
            elevation_to_rx: elevation_angle(store, tx, rx, config.earth_radius),
            elevation_to_tx: elevation_angle(store, rx, tx, config.earth_radius),
            obstruction_angle: seen.obstruction.map(|_| seen.angle),
            free_space_loss: frequency.map(|mhz| FreeSpace::loss(mhz, miles)),
            obstructions: analysis
                .obstructions
                .iter()
                .map(|o| ObstructionRow {
                    lat: o.lat,
                    lon: o.lon,
                    distance: o.distance,
                    elevation: o.elevation,
                })
                .collect(),
            line_of_sight: raise_to(analysis.line_of_sight),
            fresnel: analysis.fresnel.map(|f| FresnelRow {
                full: raise_to(f.full),
                partial: raise_to(f.partial),
                fraction: f.fraction,
            }),
        }
    }

    pub fn run(&self) -> Result<()> {
        let mut sites = vec![load_qth(&self.transmitter)?];
        if let Some(path) = &self.receiver {
            sites.push(load_qth(path)?);
        }
        let frequency = self.frequency()?;

        // Enough terrain for every site's HAAT radials.
        let study = load_study(&self.terrain, &sites, &[], 0.0, Some(HAAT_RANGE.1 + 1.0))?;
        let clutter = self.terrain.feet(self.clutter);

        let report = StudyReport {
            frequency,
            sites: sites
                .iter()
                .map(|site| site_report(&study.store, site, clutter))
                .collect(),
            path: match &sites[..] {
                [tx, rx] => Some(self.path_report(&study.store, tx, rx, frequency)),
                _ => None,
            },
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{report}");
        }
        Ok(())
    }
}

fn fmt_clearance(f: &mut fmt::Formatter<'_>, what: &str, height: Option<f64>) -> fmt::Result {
    match height {
        None => writeln!(f, "  {what}: clear"),
        Some(feet) => writeln!(f, "  {what}: raise receive antenna to {feet:.2} ft AGL"),
    }
}

impl fmt::Display for SiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Site: {}", self.name)?;
        writeln!(f, "  location: {:.6} N, {:.6} W", self.lat, self.lon)?;
        match self.ground {
            Some(ground) => {
                writeln!(f, "  ground elevation: {ground:.2} ft AMSL")?;
                writeln!(
                    f,
                    "  antenna height: {:.2} ft AGL, {:.2} ft AMSL",
                    self.agl,
                    ground + self.agl
                )?;
            }
            None => writeln!(f, "  ground elevation: unknown\n  antenna height: {:.2} ft AGL", self.agl)?,
        }
        for radial in &self.radials {
            match (radial.average, radial.all_water) {
                (Some(avg), _) => writeln!(f, "  average terrain at {:>3.0}°: {avg:.2} ft AMSL", radial.azimuth)?,
                (None, true) => writeln!(f, "  average terrain at {:>3.0}°: all water", radial.azimuth)?,
                (None, false) => writeln!(f, "  average terrain at {:>3.0}°: no terrain data", radial.azimuth)?,
            }
        }
        match self.haat {
            Some(haat) => writeln!(f, "  height above average terrain: {haat:.2} ft"),
            None => writeln!(f, "  height above average terrain: unknown"),
        }
    }
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path:")?;
        writeln!(f, "  distance: {:.2} mi", self.distance)?;
        writeln!(f, "  azimuth to receiver: {:.2}°", self.azimuth_to_rx)?;
        writeln!(f, "  azimuth to transmitter: {:.2}°", self.azimuth_to_tx)?;
        writeln!(f, "  elevation angle to receiver: {:.4}°", self.elevation_to_rx)?;
        writeln!(f, "  elevation angle to transmitter: {:.4}°", self.elevation_to_tx)?;
        if let Some(angle) = self.obstruction_angle {
            writeln!(f, "  angle to first obstruction: {angle:.4}°")?;
        }
        if let Some(loss) = self.free_space_loss {
            writeln!(f, "  free space path loss: {loss:.2} dB")?;
        }
        if self.obstructions.is_empty() {
            writeln!(f, "  no obstructions")?;
        } else {
            writeln!(f, "  obstructions (nearest the receiver first):")?;
            for o in &self.obstructions {
                writeln!(
                    f,
                    "    {:.4} N, {:.4} W, {:.2} mi, {:.2} ft AMSL",
                    o.lat, o.lon, o.distance, o.elevation
                )?;
            }
        }
        fmt_clearance(f, "line of sight", self.line_of_sight)?;
        if let Some(fresnel) = &self.fresnel {
            fmt_clearance(f, "first Fresnel zone", fresnel.full)?;
            let pct = fresnel.fraction * 100.0;
            fmt_clearance(f, &format!("{pct:.0}% of first Fresnel zone"), fresnel.partial)?;
        }
        Ok(())
    }
}

impl fmt::Display for StudyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(mhz) = self.frequency {
            writeln!(f, "Frequency: {mhz:.3} MHz")?;
        }
        for site in &self.sites {
            write!(f, "{site}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "{path}")?;
        }
        Ok(())
    }
}
