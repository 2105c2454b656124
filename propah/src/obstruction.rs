//! Obstruction and clearance analysis between a transmitter and a
//! receiver.

use crate::{
    fresnel::{wavelength_feet, FresnelZone},
    los::cos_angle,
};
use log::debug;
use terrain::{
    constants::{EARTH_RADIUS_FEET, FEET_PER_MILE},
    math::distance,
    Path, Site, TileStore,
};

/// Largest antenna rise (feet) the bisection search will consider.
const MAX_RISE: f64 = 1e9;

/// How the required antenna height is searched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearanceSearch {
    /// Raise the antenna one foot at a time.
    #[default]
    Linear,

    /// Bracket and bisect on whole feet. Gives the same heights as
    /// `Linear` for terrain whose blockage decreases monotonically
    /// with antenna height.
    Bisect,
}

impl ClearanceSearch {
    /// Returns the lowest height `h + n`, for whole `n >= 0`, at which
    /// `blocked` is false.
    fn clear<F>(self, h: f64, blocked: F) -> f64
    where
        F: Fn(f64) -> bool,
    {
        match self {
            Self::Linear => {
                let mut h = h;
                while blocked(h) {
                    h += 1.0;
                }
                h
            }
            Self::Bisect => {
                if !blocked(h) {
                    return h;
                }
                // blocked(h + lo) and !blocked(h + hi)
                let (mut lo, mut hi) = (0.0, 1.0);
                while blocked(h + hi) && hi < MAX_RISE {
                    lo = hi;
                    hi *= 2.0;
                }
                while hi - lo > 1.0 {
                    let mid = ((lo + hi) / 2.0_f64).floor();
                    if blocked(h + mid) {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                h + hi
            }
        }
    }
}

/// Settings for [obstruction_analysis].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstructionConfig {
    /// Ground clutter height (feet).
    pub clutter: f64,

    /// Earth radius (feet).
    pub earth_radius: f64,

    /// Fraction of the first Fresnel zone which must be clear for
    /// the partial clearance figure.
    pub fresnel_fraction: f64,

    pub search: ClearanceSearch,
}

impl Default for ObstructionConfig {
    fn default() -> Self {
        Self {
            clutter: 0.0,
            earth_radius: EARTH_RADIUS_FEET,
            fresnel_fraction: 0.6,
            search: ClearanceSearch::Linear,
        }
    }
}

/// Terrain penetrating the line of sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstruction {
    pub lat: f64,
    pub lon: f64,

    /// Distance from the receiver (miles).
    pub distance: f64,

    /// Height of the obstruction, clutter included (feet AMSL).
    pub elevation: f64,
}

/// Outcome of a clearance search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clearance {
    /// Clear at the current antenna height.
    Clear,

    /// Clear once the antenna is raised to this height (feet AGL).
    RaiseTo(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelClearance {
    /// The whole first Fresnel zone.
    pub full: Clearance,

    /// `fraction` of the first Fresnel zone.
    pub partial: Clearance,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObstructionReport {
    /// Obstructions, nearest the receiver first.
    pub obstructions: Vec<Obstruction>,

    pub line_of_sight: Clearance,

    /// Present when a frequency was given.
    pub fresnel: Option<FresnelClearance>,
}

/// Finds the terrain blocking the line of sight from `rx` to `tx`,
/// and how high the receive antenna must be to clear it and, given a
/// `frequency` (MHz), the first Fresnel zone.
///
/// Each search continues from the height the previous sample
/// required, working from the receiver toward the transmitter.
pub fn obstruction_analysis(
    store: &TileStore,
    tx: &Site,
    rx: &Site,
    frequency: Option<f64>,
    config: &ObstructionConfig,
) -> ObstructionReport {
    let er = config.earth_radius;
    let path = Path::new(store, tx, rx);
    let rx_ground = store.elevation(rx.lat, rx.lon);
    let h_r_orig = rx_ground + rx.alt + er;
    let h_t = store.elevation(tx.lat, tx.lon) + tx.alt + er;
    let d_tx = FEET_PER_MILE * distance(rx, tx);
    let cos_tx = |h: f64| cos_angle(h, d_tx, h_t);

    let wavelength = frequency.filter(|f| *f != 0.0).map(wavelength_feet);
    let zone = wavelength.map(|wavelength| FresnelZone::with_wavelength(1, wavelength, d_tx));

    let mut obstructions = Vec::new();
    let (mut h_r, mut h_full, mut h_partial) = (h_r_orig, h_r_orig, h_r_orig);

    for sample in path.samples().iter().skip(1).rev() {
        let site_x = Site::new(sample.lat, sample.lon, 0.0);
        let h_x = store.elevation(sample.lat, sample.lon) + er + config.clutter;
        let d_x = FEET_PER_MILE * distance(rx, &site_x);

        let blocked = |h: f64| cos_tx(h) > cos_angle(h, d_x, h_x);
        if blocked(h_r) {
            obstructions.push(Obstruction {
                lat: sample.lat,
                lon: sample.lon,
                distance: d_x / FEET_PER_MILE,
                elevation: h_x - er,
            });
        }
        h_r = config.search.clear(h_r, blocked);

        if let Some(zone) = &zone {
            let radius = zone.radius(d_x);
            // Height of the line of sight above sample x, less `k`
            // zone radii.
            let fresnel_blocked = |k: f64| {
                move |h: f64| {
                    let h_los = (h * h + d_x * d_x - 2.0 * h * d_x * cos_tx(h)).sqrt();
                    h_los - k * radius < h_x
                }
            };
            h_full = config.search.clear(h_full, fresnel_blocked(1.0));
            h_partial = config
                .search
                .clear(h_partial, fresnel_blocked(config.fresnel_fraction));
        }
    }

    let clearance = |h: f64| {
        if h > h_r_orig {
            Clearance::RaiseTo(h - rx_ground - er)
        } else {
            Clearance::Clear
        }
    };

    debug!(
        "{} obstructions between {} and {}",
        obstructions.len(),
        rx.name,
        tx.name
    );

    ObstructionReport {
        obstructions,
        line_of_sight: clearance(h_r),
        fresnel: zone.map(|_| FresnelClearance {
            full: clearance(h_full),
            partial: clearance(h_partial),
            fraction: config.fresnel_fraction,
        }),
    }
}
