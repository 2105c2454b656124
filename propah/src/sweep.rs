//! Sweeps around a transmitter to every cell on the edge of the
//! loaded terrain, marking line of sight or writing path loss into
//! the store's grids.

use crate::{
    error::PropahError,
    los::{cluttered, cos_angle, plot_path, visible_samples},
    model::{ElevationProfile, PropagationModel},
    params::PropagationParameters,
    signal::OutputQuantity,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use terrain::{
    constants::{EARTH_RADIUS_FEET, FEET_PER_MILE, FOUR_THIRDS, METERS_PER_FOOT, METERS_PER_MILE},
    math::{azimuth, lon_diff},
    sdf::Resolution,
    Bounds, Path, Site, TileStore,
};

/// Edges computed together before their results are applied in
/// parallel mode.
const PARALLEL_CHUNK: usize = 256;

/// Settings shared by [coverage_sweep] and [loss_sweep].
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Receive antenna height (feet AGL).
    pub rx_altitude: f64,

    /// Ground clutter height (feet).
    pub clutter: f64,

    /// Cells further than this from the transmitter (miles) are left
    /// alone by a loss sweep.
    pub max_range: Option<f64>,

    /// Earth radius used for line of sight (feet).
    pub earth_radius: f64,

    /// Write received power rather than field strength when the
    /// transmitter has an ERP.
    pub power_level: bool,

    /// Collect a [LossRecord] for every cell a loss sweep writes.
    pub records: bool,

    /// Compute paths on the rayon pool.
    pub parallel: bool,
}

impl SweepConfig {
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder {
            rx_altitude: None,
            clutter: 0.0,
            max_range: None,
            earth_radius_multiplier: 1.0,
            power_level: false,
            records: false,
            parallel: false,
        }
    }
}

pub struct SweepConfigBuilder {
    rx_altitude: Option<f64>,
    clutter: f64,
    max_range: Option<f64>,
    earth_radius_multiplier: f64,
    power_level: bool,
    records: bool,
    parallel: bool,
}

impl SweepConfigBuilder {
    /// Receive antenna height (feet AGL, required).
    #[must_use]
    pub fn rx_altitude(mut self, feet: f64) -> Self {
        self.rx_altitude = Some(feet);
        self
    }

    /// Ground clutter height (feet, defaults to 0).
    #[must_use]
    pub fn clutter(mut self, feet: f64) -> Self {
        self.clutter = feet;
        self
    }

    /// Maximum analysis range (miles, defaults to unlimited).
    #[must_use]
    pub fn max_range(mut self, miles: f64) -> Self {
        self.max_range = Some(miles);
        self
    }

    /// Scales the earth radius used for line of sight (defaults to 1).
    #[must_use]
    pub fn earth_radius_multiplier(mut self, multiplier: f64) -> Self {
        self.earth_radius_multiplier = multiplier;
        self
    }

    /// Write received power (dBm) instead of field strength (defaults
    /// to false).
    #[must_use]
    pub fn power_level(mut self, power_level: bool) -> Self {
        self.power_level = power_level;
        self
    }

    /// Collect per-cell records during loss sweeps (defaults to
    /// false).
    #[must_use]
    pub fn records(mut self, records: bool) -> Self {
        self.records = records;
        self
    }

    /// Compute paths in parallel (defaults to false).
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(&self) -> Result<SweepConfig, PropahError> {
        let rx_altitude = self
            .rx_altitude
            .ok_or(PropahError::Builder("rx_altitude"))?;
        if self.clutter < 0.0 {
            return Err(PropahError::Range {
                name: "clutter",
                value: self.clutter,
            });
        }
        if let Some(range) = self.max_range.filter(|range| *range < 0.0) {
            return Err(PropahError::Range {
                name: "max_range",
                value: range,
            });
        }
        if self.earth_radius_multiplier <= 0.0 {
            return Err(PropahError::Range {
                name: "earth_radius_multiplier",
                value: self.earth_radius_multiplier,
            });
        }
        Ok(SweepConfig {
            rx_altitude,
            clutter: self.clutter,
            max_range: self.max_range,
            earth_radius: EARTH_RADIUS_FEET * self.earth_radius_multiplier,
            power_level: self.power_level,
            records: self.records,
            parallel: self.parallel,
        })
    }
}

/// One cell written by a loss sweep.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    pub lat: f64,
    pub lon: f64,

    /// Bearing from the transmitter (degrees).
    pub azimuth: f64,

    /// Angle above the transmitter's horizontal to the receiver, or
    /// to the first obstruction (degrees).
    pub elevation: f64,

    /// Path loss before antenna gain (dB), or field strength (dBµV/m)
    /// or received power (dBm) after it.
    pub value: f64,

    /// Terrain blocks the direct path.
    pub obstructed: bool,

    /// The model's error code.
    pub error: i32,
}

/// Outcome of a [coverage_sweep].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageReport {
    /// Mask bit this sweep set.
    pub layer: u8,

    pub paths: usize,

    /// Cells newly marked visible.
    pub cells: usize,
}

/// Outcome of a [loss_sweep].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LossReport {
    pub quantity: OutputQuantity,

    pub paths: usize,

    /// Cells written.
    pub cells: usize,

    /// Present when records were requested, in the order cells were
    /// written.
    pub records: Vec<LossRecord>,
}

/// Returns the receiver sites along the edge of `bounds`, `altitude`
/// feet above ground.
///
/// The northern edge comes first, walking west, then the eastern edge
/// walking south, the southern edge walking west and the western edge
/// walking north.
#[allow(clippy::cast_precision_loss)]
pub fn perimeter(bounds: &Bounds, resolution: Resolution, altitude: f64) -> Vec<Site> {
    let dpp = resolution.dpp();
    let min_north = f64::from(bounds.min_north);
    let max_north = f64::from(bounds.max_north);
    let min_west = f64::from(bounds.min_west);
    let max_west = f64::from(bounds.max_west);
    let first_west = min_west + dpp;
    let first_north = max_north - dpp;

    let westward = |lat: f64| {
        (0..)
            .map(move |y| first_west + dpp * y as f64)
            .take_while(move |lon| lon_diff(*lon, max_west) <= 0.0)
            .map(move |lon| Site::new(lat, lon, altitude))
    };

    let mut sites: Vec<Site> = westward(max_north).collect();
    sites.extend(
        (0..)
            .map(|y| first_north - dpp * y as f64)
            .take_while(|lat| *lat >= min_north)
            .map(|lat| Site::new(lat, min_west, altitude)),
    );
    sites.extend(westward(min_north));
    sites.extend(
        (0..)
            .map(|y| min_north + dpp * y as f64)
            .take_while(|lat| *lat < max_north)
            .map(|lat| Site::new(lat, max_west, altitude)),
    );
    sites
}

/// Marks every cell visible from `source` with the store's next line
/// of sight layer.
///
/// `progress` is called with the number of edge paths done and the
/// total after each path.
pub fn coverage_sweep<P>(
    store: &mut TileStore,
    source: &Site,
    config: &SweepConfig,
    mut progress: P,
) -> CoverageReport
where
    P: FnMut(usize, usize),
{
    let layer = store.next_los_layer();
    let Some(bounds) = store.bounds() else {
        warn!("no terrain loaded, skipping line of sight sweep");
        return CoverageReport {
            layer,
            paths: 0,
            cells: 0,
        };
    };
    let edges = perimeter(&bounds, store.resolution(), config.rx_altitude);
    let total = edges.len();
    info!(
        "line of sight from {} to {total} edge cells, layer {layer}",
        source.name
    );

    let mut cells = 0;
    if config.parallel {
        let mut done = 0;
        for chunk in edges.chunks(PARALLEL_CHUNK) {
            let shared: &TileStore = store;
            let visible: Vec<(Path, Vec<usize>)> = chunk
                .par_iter()
                .map(|edge| {
                    let path = Path::new(shared, source, edge);
                    let visible = visible_samples(
                        &path,
                        source.alt,
                        edge.alt,
                        config.clutter,
                        config.earth_radius,
                    );
                    (path, visible)
                })
                .collect();
            for (path, indices) in visible {
                for idx in indices {
                    let sample = &path[idx];
                    if store.mask(sample.lat, sample.lon) & layer == 0
                        && store.or_mask(sample.lat, sample.lon, layer).is_some()
                    {
                        cells += 1;
                    }
                }
                done += 1;
                progress(done, total);
            }
        }
    } else {
        for (done, edge) in edges.iter().enumerate() {
            cells += plot_path(store, source, edge, layer, config.clutter, config.earth_radius);
            progress(done + 1, total);
        }
    }

    debug!("{cells} cells visible from {}", source.name);
    CoverageReport {
        layer,
        paths: total,
        cells,
    }
}

/// Writes the loss, field strength or received power from `source`
/// to every cell between it and the edge of the loaded terrain.
///
/// Each cell is written once per sweep, by the first path to reach
/// it, and merged with what earlier sweeps left there (see
/// [OutputQuantity::merge]). `progress` is called with the number of
/// edge paths done and the total after each path.
pub fn loss_sweep<M, P>(
    store: &mut TileStore,
    source: &Site,
    params: &PropagationParameters,
    model: &M,
    config: &SweepConfig,
    mut progress: P,
) -> LossReport
where
    M: PropagationModel + ?Sized,
    P: FnMut(usize, usize),
{
    let quantity = OutputQuantity::from_params(params.erp, config.power_level);
    let mut report = LossReport {
        quantity,
        paths: 0,
        cells: 0,
        records: Vec::new(),
    };
    let Some(bounds) = store.bounds() else {
        warn!("no terrain loaded, skipping path loss sweep");
        return report;
    };
    let pass = store.begin_pass();
    let edges = perimeter(&bounds, store.resolution(), config.rx_altitude);
    let total = edges.len();
    report.paths = total;
    info!(
        "path loss from {} to {total} edge cells, writing {quantity:?}",
        source.name
    );

    let sweep = LossPaths {
        source,
        params,
        model,
        config,
        quantity,
        pass,
    };

    if config.parallel {
        let mut done = 0;
        for chunk in edges.chunks(PARALLEL_CHUNK) {
            let shared: &TileStore = store;
            let updates: Vec<Vec<CellUpdate>> = chunk
                .par_iter()
                .map(|edge| sweep.updates(shared, edge))
                .collect();
            for path in updates {
                sweep.apply(store, path, &mut report);
                done += 1;
                progress(done, total);
            }
        }
    } else {
        for (done, edge) in edges.iter().enumerate() {
            let path = sweep.updates(store, edge);
            sweep.apply(store, path, &mut report);
            progress(done + 1, total);
        }
    }

    debug!("{} cells written from {}", report.cells, source.name);
    report
}

/// A computed, not yet merged, cell value.
struct CellUpdate {
    lat: f64,
    lon: f64,
    byte: u8,
    record: Option<LossRecord>,
}

struct LossPaths<'a, M: ?Sized> {
    source: &'a Site,
    params: &'a PropagationParameters,
    model: &'a M,
    config: &'a SweepConfig,
    quantity: OutputQuantity,
    pass: u8,
}

impl<M> LossPaths<'_, M>
where
    M: PropagationModel + ?Sized,
{
    /// Computes the value of every cell on the path to `destination`
    /// not yet written this pass.
    fn updates(&self, store: &TileStore, destination: &Site) -> Vec<CellUpdate> {
        let (source, params, config) = (self.source, self.params, self.config);
        let path = Path::new(store, source, destination);
        let samples = path.samples();
        let len = samples.len();
        if len < 4 {
            return Vec::new();
        }

        // Clutter sits on interior samples only.
        let elevations: Vec<f64> = samples
            .iter()
            .enumerate()
            .map(|(x, sample)| {
                let feet = if x == 0 || x == len - 1 {
                    sample.elevation
                } else {
                    cluttered(sample, config.clutter)
                };
                feet * METERS_PER_FOOT
            })
            .collect();

        let four_thirds = FOUR_THIRDS * EARTH_RADIUS_FEET;
        let xmtr = four_thirds + source.alt + samples[0].elevation;
        let needs_angle = params.has_elevation_pattern() || config.records;
        let max_range = config.max_range.unwrap_or(f64::INFINITY);
        let tx_height = source.alt * METERS_PER_FOOT;
        let rx_height = destination.alt * METERS_PER_FOOT;

        let mut updates = Vec::new();
        for y in 2..len - 1 {
            let sample = &samples[y];
            if sample.distance > max_range {
                break;
            }
            if store.pass(sample.lat, sample.lon) == self.pass {
                continue;
            }

            let rcvr = four_thirds + destination.alt + sample.elevation;
            let cos_rcvr =
                cos_angle(xmtr, FEET_PER_MILE * sample.distance, rcvr).clamp(-1.0, 1.0);
            let (elevation, obstructed) = if needs_angle {
                let blocking = samples[2..y].iter().find_map(|test| {
                    let test_alt = four_thirds + cluttered(test, config.clutter);
                    let cos_test = cos_angle(xmtr, FEET_PER_MILE * test.distance, test_alt)
                        .clamp(-1.0, 1.0);
                    (cos_rcvr >= cos_test).then_some(cos_test)
                });
                (
                    blocking.unwrap_or(cos_rcvr).acos().to_degrees() - 90.0,
                    blocking.is_some(),
                )
            } else {
                (0.0, false)
            };

            let profile = ElevationProfile::new(
                METERS_PER_MILE * (sample.distance - samples[y - 1].distance),
                &elevations[..=y],
            );
            let result = self
                .model
                .point_to_point(&profile, tx_height, rx_height, params);
            let bearing = azimuth(source, &Site::new(sample.lat, sample.lon, 0.0));

            let mut loss = result.loss_db;
            if let Some(gain) = params
                .pattern
                .as_ref()
                .and_then(|pattern| pattern.lookup(bearing, elevation))
                .filter(|gain| *gain != 0.0)
            {
                loss -= 20.0 * f64::from(gain).log10();
            }
            let value = self.quantity.value(loss, params.frequency, params.erp);

            updates.push(CellUpdate {
                lat: sample.lat,
                lon: sample.lon,
                byte: self.quantity.encode(value),
                record: config.records.then_some(LossRecord {
                    lat: sample.lat,
                    lon: sample.lon,
                    azimuth: bearing,
                    elevation,
                    value: match self.quantity {
                        OutputQuantity::PathLoss => result.loss_db,
                        _ => value,
                    },
                    obstructed,
                    error: result.error,
                }),
            });
        }
        updates
    }

    /// Merges `updates` into the store, skipping cells an earlier
    /// path already wrote this pass.
    fn apply(&self, store: &mut TileStore, updates: Vec<CellUpdate>, report: &mut LossReport) {
        for update in updates {
            let (lat, lon) = (update.lat, update.lon);
            if store.pass(lat, lon) == self.pass {
                continue;
            }
            let byte = self.quantity.merge(store.signal(lat, lon), update.byte);
            if store.put_signal(lat, lon, byte) {
                store.put_pass(lat, lon, self.pass);
                report.cells += 1;
                report.records.extend(update.record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{coverage_sweep, loss_sweep, perimeter, LossReport, SweepConfig};
    use crate::{
        antenna::{AntennaPattern, AzimuthPattern},
        los::tests::flat_store,
        model::{ElevationProfile, P2pResult},
        params::PropagationParameters,
        signal::OutputQuantity,
    };
    use approx::assert_relative_eq;
    use terrain::{
        math::destination,
        sdf::{Resolution, Tile, TileKey},
        Site, StoreConfig, TileStore,
    };

    fn one_tile(f: impl FnMut(usize, usize) -> i16) -> TileStore {
        let mut store = TileStore::new(StoreConfig::new(1, Resolution::Standard).unwrap());
        store
            .insert(Tile::from_fn(TileKey::new(44, 71), Resolution::Standard, f))
            .unwrap();
        store
    }

    fn constant(loss: f64) -> impl Fn(&ElevationProfile<'_>, f64, f64, &PropagationParameters) -> P2pResult + Sync {
        move |_: &ElevationProfile<'_>, _: f64, _: f64, _: &PropagationParameters| P2pResult {
            loss_db: loss,
            mode: String::from("Constant"),
            error: 0,
        }
    }

    fn by_length(profile: &ElevationProfile<'_>, _: f64, _: f64, _: &PropagationParameters) -> P2pResult {
        let ground: f64 = profile.elevations().iter().sum();
        P2pResult {
            loss_db: 60.0 + 20.0 * profile.length().log10() + ground / 1000.0,
            mode: String::new(),
            error: 0,
        }
    }

    #[test]
    fn test_builder() {
        assert!(SweepConfig::builder().build().is_err());
        assert!(SweepConfig::builder().rx_altitude(10.0).clutter(-1.0).build().is_err());
        assert!(SweepConfig::builder()
            .rx_altitude(10.0)
            .earth_radius_multiplier(0.0)
            .build()
            .is_err());
        let config = SweepConfig::builder()
            .rx_altitude(10.0)
            .earth_radius_multiplier(2.0)
            .build()
            .unwrap();
        assert_relative_eq!(config.earth_radius, 2.0 * 20_902_230.97);
        assert!(config.max_range.is_none());
    }

    #[test]
    fn test_perimeter_order() {
        let store = flat_store(0);
        let bounds = store.bounds().unwrap();
        let dpp = Resolution::Standard.dpp();
        let sites = perimeter(&bounds, Resolution::Standard, 25.0);

        // Two degrees on each side at 1200 cells per degree.
        assert!((sites.len() as i64 - 4 * 2400).abs() <= 4, "{}", sites.len());
        assert!(sites.iter().all(|site| site.alt == 25.0));

        assert_relative_eq!(sites[0].lat, 46.0);
        assert_relative_eq!(sites[0].lon, 71.0 + dpp, epsilon = 1e-12);
        let north = sites.iter().take_while(|site| site.lat == 46.0).count();
        assert!(sites[..north].windows(2).all(|w| w[0].lon < w[1].lon));

        let east = &sites[north..];
        assert_relative_eq!(east[0].lon, 71.0);
        assert_relative_eq!(east[0].lat, 46.0 - dpp, epsilon = 1e-12);

        let last = sites.last().unwrap();
        assert_relative_eq!(last.lon, 73.0);
        assert!(last.lat < 46.0 && last.lat > 46.0 - 2.0 * dpp);
    }

    #[test]
    fn test_loss_sweep() {
        let mut store = one_tile(|_, _| 0);
        let tx = Site::new(44.5, 71.5, 100.0).with_name("tx");
        let config = SweepConfig::builder().rx_altitude(20.0).build().unwrap();
        let params = PropagationParameters::default();

        let mut calls = 0;
        let report = loss_sweep(&mut store, &tx, &params, &constant(110.0), &config, |done, total| {
            calls += 1;
            assert!(done <= total);
        });
        assert_eq!(report.quantity, OutputQuantity::PathLoss);
        assert_eq!(calls, report.paths);
        assert!(report.cells > 0);
        assert!(report.records.is_empty());

        let rx = destination(&tx, 45.0, 10.0);
        assert_eq!(store.signal(rx.lat, rx.lon), 110);
        // The transmitter's own cell is never written.
        assert_eq!(store.signal(tx.lat, tx.lon), 0);

        // A later, weaker transmitter leaves the lower loss in place,
        // a stronger one replaces it.
        loss_sweep(&mut store, &tx, &params, &constant(130.0), &config, |_, _| {});
        assert_eq!(store.signal(rx.lat, rx.lon), 110);
        loss_sweep(&mut store, &tx, &params, &constant(95.4), &config, |_, _| {});
        assert_eq!(store.signal(rx.lat, rx.lon), 95);
    }

    #[test]
    fn test_antenna_gain() {
        let mut store = one_tile(|_, _| 0);
        let tx = Site::new(44.5, 71.5, 100.0);
        let config = SweepConfig::builder()
            .rx_altitude(20.0)
            .max_range(5.0)
            .build()
            .unwrap();
        let pattern = AntennaPattern::builder()
            .azimuth(AzimuthPattern {
                rotation: 0.0,
                samples: vec![(0.0, 0.1), (180.0, 0.1)],
            })
            .build()
            .unwrap();
        let params = PropagationParameters {
            pattern: Some(pattern),
            ..PropagationParameters::default()
        };
        loss_sweep(&mut store, &tx, &params, &constant(100.0), &config, |_, _| {});

        // A tenth of the field is 20 dB more loss.
        let rx = destination(&tx, 135.0, 3.0);
        assert_eq!(store.signal(rx.lat, rx.lon), 120);
    }

    #[test]
    fn test_field_strength_sweep() {
        let mut store = one_tile(|_, _| 0);
        let tx = Site::new(44.5, 71.5, 100.0);
        let config = SweepConfig::builder()
            .rx_altitude(20.0)
            .max_range(12.0)
            .build()
            .unwrap();
        let params = PropagationParameters {
            frequency: 100.0,
            erp: 1000.0,
            ..PropagationParameters::default()
        };
        let report = loss_sweep(&mut store, &tx, &params, &constant(100.0), &config, |_, _| {});
        assert_eq!(report.quantity, OutputQuantity::FieldStrength);

        // 139.4 + 40 - 100 dBuV/m, offset by 100.
        let near = destination(&tx, 200.0, 10.0);
        assert_eq!(store.signal(near.lat, near.lon), 179);
        let far = destination(&tx, 200.0, 20.0);
        assert_eq!(store.signal(far.lat, far.lon), 0);
    }

    #[test]
    fn test_records() {
        let mut store = one_tile(|_, _| 0);
        let tx = Site::new(44.5, 71.5, 100.0);
        let config = SweepConfig::builder()
            .rx_altitude(20.0)
            .max_range(3.0)
            .records(true)
            .build()
            .unwrap();
        let report = loss_sweep(
            &mut store,
            &tx,
            &PropagationParameters::default(),
            &constant(88.0),
            &config,
            |_, _| {},
        );
        assert_eq!(report.records.len(), report.cells);
        for record in &report.records {
            assert_relative_eq!(record.value, 88.0);
            assert!((0.0..360.0).contains(&record.azimuth));
            // Flat sea: everything within a few miles is below the
            // transmitter and in plain view.
            assert!(record.elevation < 0.0);
            assert!(!record.obstructed);
        }
    }

    #[test]
    fn test_parallel_loss_matches_sequential() {
        let hills = |x: usize, y: usize| ((x * 7 + y * 13) % 97) as i16 * 3;
        let tx = Site::new(44.47, 71.52, 60.0);
        let run = |parallel: bool| -> (TileStore, LossReport) {
            let mut store = one_tile(hills);
            let config = SweepConfig::builder()
                .rx_altitude(15.0)
                .clutter(10.0)
                .max_range(4.0)
                .records(true)
                .parallel(parallel)
                .build()
                .unwrap();
            let params = PropagationParameters::default();
            let report = loss_sweep(&mut store, &tx, &params, &by_length, &config, |_, _| {});
            (store, report)
        };

        let (sequential, seq_report) = run(false);
        let (parallel, par_report) = run(true);
        assert_eq!(seq_report, par_report);
        assert!(seq_report.records.iter().any(|record| record.obstructed));
        assert_eq!(sequential.tiles()[0].signals(), parallel.tiles()[0].signals());
    }

    #[test]
    fn test_coverage_sweep() {
        let tx = Site::new(44.5, 71.5, 100.0);
        let config = SweepConfig::builder().rx_altitude(20.0).build().unwrap();
        let mut sequential = one_tile(|_, _| 0);
        let report = coverage_sweep(&mut sequential, &tx, &config, |_, _| {});
        assert_eq!(report.layer, 1);
        assert!(report.cells > 0);

        // About 20 miles to the radio horizon over sea.
        let near = destination(&tx, 300.0, 5.0);
        assert_eq!(sequential.mask(near.lat, near.lon) & 1, 1);
        let far = destination(&tx, 0.0, 30.0);
        assert_eq!(sequential.mask(far.lat, far.lon) & 1, 0);

        let mut parallel = one_tile(|_, _| 0);
        let config = SweepConfig::builder()
            .rx_altitude(20.0)
            .parallel(true)
            .build()
            .unwrap();
        let par_report = coverage_sweep(&mut parallel, &tx, &config, |_, _| {});
        assert_eq!(par_report, report);
        assert_eq!(parallel.tiles()[0].masks(), sequential.tiles()[0].masks());
    }

    #[test]
    fn test_coverage_sweep_clutter_above_receivers() {
        let tx = Site::new(44.5, 71.5, 100.0);
        let config = SweepConfig::builder()
            .rx_altitude(20.0)
            .clutter(25.0)
            .build()
            .unwrap();
        let mut store = one_tile(|_, _| 10);
        let report = coverage_sweep(&mut store, &tx, &config, |_, _| {});
        assert!(report.cells > 0);

        // Close in, the transmitter clears the clutter next to each
        // receiver; further out it does not.
        let near = destination(&tx, 90.0, 0.3);
        assert_eq!(store.mask(near.lat, near.lon) & 1, 1);
        let far = destination(&tx, 90.0, 5.0);
        assert_eq!(store.mask(far.lat, far.lon) & 1, 0);
    }
}
