//! Point-to-point propagation model interface.

use crate::PropagationParameters;

/// Terrain between a transmitter (first element) and receiver (last
/// element), evenly spaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationProfile<'a> {
    /// Distance between successive samples (meters).
    spacing: f64,

    /// Terrain height of each sample (meters).
    elevations: &'a [f64],
}

impl<'a> ElevationProfile<'a> {
    pub fn new(spacing: f64, elevations: &'a [f64]) -> Self {
        Self {
            spacing,
            elevations,
        }
    }

    /// Distance between successive samples (meters).
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Terrain height of each sample (meters).
    pub fn elevations(&self) -> &'a [f64] {
        self.elevations
    }

    /// Number of intervals between samples.
    pub fn intervals(&self) -> usize {
        self.elevations.len().saturating_sub(1)
    }

    /// Length of the profile (meters).
    #[allow(clippy::cast_precision_loss)]
    pub fn length(&self) -> f64 {
        self.intervals() as f64 * self.spacing
    }

    /// Returns the profile in the flat layout classic ITM
    /// implementations take: interval count, spacing, then heights.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_pfl(&self) -> Vec<f64> {
        let mut pfl = Vec::with_capacity(self.elevations.len() + 2);
        pfl.push(self.intervals() as f64);
        pfl.push(self.spacing);
        pfl.extend_from_slice(self.elevations);
        pfl
    }
}

/// What a model reports for one path.
#[derive(Debug, Clone, PartialEq)]
pub struct P2pResult {
    /// Basic transmission loss (dB).
    pub loss_db: f64,

    /// Dominant propagation mode, for reports.
    pub mode: String,

    /// Model specific warning or error code, 0 for none.
    pub error: i32,
}

/// A point-to-point path loss model.
///
/// Implementations must be pure: the same inputs give the same
/// result. Sweeps may call a model from several threads at once.
pub trait PropagationModel: Sync {
    /// Returns the loss across `profile` between a transmitter
    /// `tx_height` and a receiver `rx_height` meters above ground.
    fn point_to_point(
        &self,
        profile: &ElevationProfile<'_>,
        tx_height: f64,
        rx_height: f64,
        params: &PropagationParameters,
    ) -> P2pResult;
}

impl<F> PropagationModel for F
where
    F: Fn(&ElevationProfile<'_>, f64, f64, &PropagationParameters) -> P2pResult + Sync,
{
    fn point_to_point(
        &self,
        profile: &ElevationProfile<'_>,
        tx_height: f64,
        rx_height: f64,
        params: &PropagationParameters,
    ) -> P2pResult {
        self(profile, tx_height, rx_height, params)
    }
}

/// Free space loss, ignoring terrain entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpace;

impl FreeSpace {
    /// Free space loss (dB) over `miles` at `frequency` MHz.
    pub fn loss(frequency: f64, miles: f64) -> f64 {
        36.6 + 20.0 * frequency.log10() + 20.0 * miles.log10()
    }
}

impl PropagationModel for FreeSpace {
    fn point_to_point(
        &self,
        profile: &ElevationProfile<'_>,
        _tx_height: f64,
        _rx_height: f64,
        params: &PropagationParameters,
    ) -> P2pResult {
        let miles = profile.length() / terrain::constants::METERS_PER_MILE;
        P2pResult {
            loss_db: Self::loss(params.frequency, miles).max(0.0),
            mode: String::from("Free Space"),
            error: 0,
        }
    }
}
