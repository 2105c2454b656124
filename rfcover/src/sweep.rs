//! The `coverage` and `loss` commands.

use crate::{
    lrp::find_params,
    options::{Coverage, Loss, SweepArgs},
    pattern::load_pattern,
    plan::load_study,
    progress, qth,
};
use anyhow::{bail, Context, Result};
use log::info;
use propah::{
    sweep::{coverage_sweep, loss_sweep, CoverageReport, LossRecord},
    FreeSpace, OutputQuantity, SweepConfig,
};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use terrain::{Bounds, Site, TileStore};

/// Mask bits of the up to four line of sight layers.
const LOS_LAYERS: [u8; 4] = [1, 8, 16, 32];

impl SweepArgs {
    fn transmitters(&self) -> Result<Vec<Site>> {
        self.transmitters
            .iter()
            .map(|path| qth::load_qth(path))
            .collect()
    }

    fn rx_altitude(&self) -> f64 {
        self.terrain.feet(self.rx_height)
    }

    fn max_range(&self) -> Option<f64> {
        self.max_range.map(|range| self.terrain.miles(range))
    }

    fn config(&self, range: f64, records: bool, power_level: bool) -> Result<SweepConfig> {
        Ok(SweepConfig::builder()
            .rx_altitude(self.rx_altitude())
            .clutter(self.terrain.feet(self.clutter))
            .max_range(range)
            .earth_radius_multiplier(self.earth_radius_multiplier)
            .records(records)
            .power_level(power_level)
            .parallel(self.parallel)
            .build()?)
    }
}

#[derive(Serialize)]
struct SiteSummary<'a, R> {
    name: &'a str,
    lat: f64,
    lon: f64,

    /// Analysis range (miles).
    range: f64,

    #[serde(flatten)]
    report: R,
}

#[derive(Serialize)]
struct TileSummary {
    tile: String,

    /// Visible cells on each line of sight layer.
    visible: Vec<(u8, usize)>,
}

#[derive(Serialize)]
struct CoverageSummary<'a> {
    transmitters: Vec<SiteSummary<'a, CoverageReport>>,
    tiles: Vec<TileSummary>,
}

impl Coverage {
    pub fn run(&self) -> Result<()> {
        let args = &self.sweep;
        let transmitters = args.transmitters()?;
        if transmitters.len() > LOS_LAYERS.len() {
            bail!("at most {} transmitters per coverage map", LOS_LAYERS.len());
        }
        let mut study = load_study(
            &args.terrain,
            &transmitters,
            &[],
            args.rx_altitude(),
            args.max_range(),
        )?;

        let mut summaries = Vec::with_capacity(transmitters.len());
        for (tx, &range) in transmitters.iter().zip(&study.ranges) {
            let config = args.config(range, false, false)?;
            let pb = progress::bar(format!("Line of sight from {}", tx.name), 0)?;
            let report = coverage_sweep(&mut study.store, tx, &config, progress::sweep_callback(&pb));
            pb.finish_and_clear();
            info!("{} cells visible from {}", report.cells, tx.name);
            summaries.push(SiteSummary {
                name: &tx.name,
                lat: tx.lat,
                lon: tx.lon,
                range,
                report,
            });
        }

        let summary = CoverageSummary {
            transmitters: summaries,
            tiles: tile_coverage(&study.store),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

fn tile_coverage(store: &TileStore) -> Vec<TileSummary> {
    store
        .tiles()
        .iter()
        .map(|tile| TileSummary {
            tile: tile.key().to_string(),
            visible: LOS_LAYERS
                .iter()
                .map(|&layer| {
                    let count = tile.masks().iter().filter(|&&mask| mask & layer != 0).count();
                    (layer, count)
                })
                .filter(|(_, count)| *count > 0)
                .collect(),
        })
        .collect()
}

#[derive(Serialize)]
struct LossSummary<'a> {
    quantity: OutputQuantity,
    frequency: f64,
    erp: f64,
    transmitters: Vec<SiteSummary<'a, LossCells>>,
}

#[derive(Serialize)]
struct LossCells {
    paths: usize,
    cells: usize,
}

impl Loss {
    pub fn run(&self) -> Result<()> {
        let args = &self.sweep;
        let transmitters = args.transmitters()?;
        let mut study = load_study(
            &args.terrain,
            &transmitters,
            &[],
            args.rx_altitude(),
            args.max_range(),
        )?;

        let mut records_out = match &self.records {
            Some(path) => Some(RecordWriter::create(path.clone(), study.store.bounds())?),
            None => None,
        };

        let mut summaries = Vec::with_capacity(transmitters.len());
        let mut quantity = OutputQuantity::PathLoss;
        let (mut frequency, mut erp) = (0.0, 0.0);
        for (tx, &range) in transmitters.iter().zip(&study.ranges) {
            let mut params = find_params(self.lrp.as_deref(), tx)?;
            if let Some(watts) = self.erp {
                params.erp = watts;
            }
            if let Some(qth) = &tx.filename {
                params.pattern = load_pattern(qth)?;
            }
            (frequency, erp) = (params.frequency, params.erp);

            let config = args.config(range, records_out.is_some(), self.dbm)?;
            let pb = progress::bar(format!("Path loss from {}", tx.name), 0)?;
            let report = loss_sweep(
                &mut study.store,
                tx,
                &params,
                &FreeSpace,
                &config,
                progress::sweep_callback(&pb),
            );
            pb.finish_and_clear();
            quantity = report.quantity;

            if let Some(out) = records_out.as_mut() {
                out.write(report.quantity, &report.records)?;
            }
            summaries.push(SiteSummary {
                name: &tx.name,
                lat: tx.lat,
                lon: tx.lon,
                range,
                report: LossCells {
                    paths: report.paths,
                    cells: report.cells,
                },
            });
        }
        if let Some(out) = records_out {
            out.finish()?;
        }

        let summary = LossSummary {
            quantity,
            frequency,
            erp,
            transmitters: summaries,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

/// Alphanumeric output: the analyzed region's bounds, then one line
/// per cell.
struct RecordWriter {
    path: PathBuf,
    wtr: BufWriter<File>,
}

impl RecordWriter {
    fn create(path: PathBuf, bounds: Option<Bounds>) -> Result<Self> {
        let file = File::create(&path).with_context(|| format!("creating {path:?}"))?;
        let mut wtr = BufWriter::new(file);
        if let Some(bounds) = bounds {
            write_header(&mut wtr, &bounds)?;
        }
        Ok(Self { path, wtr })
    }

    fn write(&mut self, quantity: OutputQuantity, records: &[LossRecord]) -> Result<()> {
        write_records(&mut self.wtr, quantity, records)
            .with_context(|| format!("writing {:?}", self.path))
    }

    fn finish(mut self) -> Result<()> {
        self.wtr.flush()?;
        info!("records written to {:?}", self.path);
        Ok(())
    }
}

fn write_header<W: Write>(wtr: &mut W, bounds: &Bounds) -> Result<()> {
    writeln!(
        wtr,
        "{}, {}\t; max_west, min_west",
        bounds.max_west, bounds.min_west
    )?;
    writeln!(
        wtr,
        "{}, {}\t; max_north, min_north",
        bounds.max_north, bounds.min_north
    )?;
    Ok(())
}

fn write_records<W: Write>(wtr: &mut W, quantity: OutputQuantity, records: &[LossRecord]) -> Result<()> {
    for record in records {
        write!(
            wtr,
            "{:.7}, {:.7}, {:.3}, {:.3}, ",
            record.lat, record.lon, record.azimuth, record.elevation
        )?;
        match quantity {
            OutputQuantity::PathLoss => write!(wtr, "{:.2}", record.value)?,
            _ => write!(wtr, "{:.3}", record.value)?,
        }
        if record.obstructed {
            write!(wtr, " *")?;
        }
        writeln!(wtr)?;
    }
    Ok(())
}
