use clap::{Args, Parser};
use std::path::PathBuf;
use terrain::constants::{FEET_PER_METER, KM_PER_MILE};

/// RF line-of-sight and path loss studies over SDF terrain.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Map line-of-sight coverage of up to four transmitters.
    Coverage(Coverage),

    /// Map path loss, field strength, or received power of one or
    /// more transmitters.
    Loss(Loss),

    /// Print site, path, and obstruction reports.
    Report(Report),

    /// Convert SRTM (.hgt) files to SDF.
    Convert(Convert),
}

/// Where terrain comes from and how much of it to hold.
#[derive(Debug, Clone, Args)]
pub struct TerrainArgs {
    /// Directory of SDF and/or SRTM (.hgt) elevation tiles.
    #[arg(short = 'd', long)]
    pub sdf_dir: PathBuf,

    /// One-degree tiles held in memory: 1, 2, 4, 9, 16, 25, 36, 49, or
    /// 64.
    #[arg(short, long, default_value_t = 4)]
    pub capacity: usize,

    /// Use 1 arc-second tiles.
    #[arg(long)]
    pub high_res: bool,

    /// User-defined terrain file.
    #[arg(long)]
    pub udt: Option<PathBuf>,

    /// Heights are in meters and distances in kilometers.
    #[arg(long)]
    pub metric: bool,
}

impl TerrainArgs {
    /// Returns `height` in feet.
    pub fn feet(&self, height: f64) -> f64 {
        if self.metric {
            height * FEET_PER_METER
        } else {
            height
        }
    }

    /// Returns `distance` in miles.
    pub fn miles(&self, distance: f64) -> f64 {
        if self.metric {
            distance / KM_PER_MILE
        } else {
            distance
        }
    }
}

/// What every sweep needs.
#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Transmitter site (.qth) files.
    #[arg(short, long = "tx", required = true)]
    pub transmitters: Vec<PathBuf>,

    /// Receive antenna height above ground.
    #[arg(short = 'H', long)]
    pub rx_height: f64,

    /// Ground clutter height.
    #[arg(long, default_value_t = 0.0)]
    pub clutter: f64,

    /// Analysis range; defaults to the sum of both radio horizons.
    #[arg(short = 'R', long)]
    pub max_range: Option<f64>,

    /// Earth radius multiplier for line of sight.
    #[arg(short = 'm', long, default_value_t = 1.0)]
    pub earth_radius_multiplier: f64,

    /// Compute paths on all cores.
    #[arg(short, long)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Coverage {
    #[command(flatten)]
    pub sweep: SweepArgs,
}

#[derive(Debug, Clone, Args)]
pub struct Loss {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Propagation parameter (.lrp) file; defaults to one named after
    /// the first transmitter, then `splat.lrp`.
    #[arg(long)]
    pub lrp: Option<PathBuf>,

    /// Effective radiated power (watts), overriding the parameter
    /// file.
    #[arg(long)]
    pub erp: Option<f64>,

    /// Write received power (dBm) instead of field strength.
    #[arg(long)]
    pub dbm: bool,

    /// Write a record of every analyzed cell to this file.
    #[arg(long)]
    pub records: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct Report {
    #[command(flatten)]
    pub terrain: TerrainArgs,

    /// Transmitter site (.qth) file.
    #[arg(short, long = "tx")]
    pub transmitter: PathBuf,

    /// Receiver site (.qth) file.
    #[arg(short, long = "rx")]
    pub receiver: Option<PathBuf>,

    /// Frequency (MHz) for Fresnel zone clearance and free space
    /// loss; read from `--lrp` when absent.
    #[arg(short, long)]
    pub frequency: Option<f64>,

    /// Propagation parameter (.lrp) file.
    #[arg(long)]
    pub lrp: Option<PathBuf>,

    /// Ground clutter height.
    #[arg(long, default_value_t = 0.0)]
    pub clutter: f64,

    /// Earth radius multiplier for line of sight.
    #[arg(short = 'm', long, default_value_t = 1.0)]
    pub earth_radius_multiplier: f64,

    /// Fraction of the first Fresnel zone to clear.
    #[arg(long, default_value_t = 0.6)]
    pub fresnel_fraction: f64,

    /// Search antenna heights by bisection rather than foot by foot.
    #[arg(long)]
    pub bisect: bool,

    /// Print JSON rather than text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Convert {
    /// Reconvert even if the SDF file already exists.
    #[arg(short = 'O', long)]
    pub overwrite: bool,

    /// Output directory.
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Input SRTM elevation (.hgt) files.
    pub input: Vec<PathBuf>,
}
