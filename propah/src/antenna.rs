//! Transmit antenna radiation patterns.
//!
//! A pattern is stored as a table of normalized field amplitudes
//! indexed by whole degrees of azimuth (0 through 360 inclusive) and
//! tenths of a degree of elevation angle, from 10 degrees above the
//! horizon (index 0) to 90 degrees below it (index 1000).

use crate::PropahError;
use std::fmt;

/// Azimuth slots, one per whole degree, with 360 duplicating 0.
pub const AZIMUTH_SLOTS: usize = 361;

/// Elevation slots, one per tenth of a degree.
pub const ELEVATION_SLOTS: usize = 1001;

/// Raw elevation samples, one per hundredth of a degree from -10 to
/// +90.
const FINE_ELEVATION_SLOTS: usize = 10_001;

/// Horizontal radiation pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AzimuthPattern {
    /// Clockwise rotation (degrees) applied to the samples.
    pub rotation: f64,

    /// `(azimuth degrees, normalized amplitude)` samples.
    pub samples: Vec<(f64, f64)>,
}

/// Vertical radiation pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationPattern {
    /// Mechanical downtilt (degrees).
    pub tilt: f64,

    /// Azimuth (degrees) toward which the antenna is tilted.
    pub tilt_azimuth: f64,

    /// `(degrees below the horizon, normalized amplitude)` samples.
    pub samples: Vec<(f64, f64)>,
}

/// A combined azimuth and elevation gain table.
#[derive(Clone, PartialEq)]
pub struct AntennaPattern {
    /// `AZIMUTH_SLOTS` rows of `ELEVATION_SLOTS` amplitudes.
    gains: Box<[f32]>,
    has_azimuth: bool,
    has_elevation: bool,
}

impl AntennaPattern {
    pub fn builder() -> AntennaPatternBuilder {
        AntennaPatternBuilder {
            azimuth: None,
            elevation: None,
        }
    }

    /// Returns the normalized amplitude at whole degree `azimuth` and
    /// elevation slot `elevation`, or `None` if either is out of range.
    pub fn gain(&self, azimuth: usize, elevation: usize) -> Option<f32> {
        (azimuth < AZIMUTH_SLOTS && elevation < ELEVATION_SLOTS)
            .then(|| self.gains[azimuth * ELEVATION_SLOTS + elevation])
    }

    /// Returns the normalized amplitude toward `azimuth` degrees and
    /// `elevation_angle` degrees above the horizon, or `None` when the
    /// angle falls outside the table.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lookup(&self, azimuth: f64, elevation_angle: f64) -> Option<f32> {
        let x = (10.0 * (10.0 - elevation_angle)).round_ties_even();
        let az = azimuth.round_ties_even();
        ((0.0..=1000.0).contains(&x) && (0.0..=360.0).contains(&az))
            .then_some((az as usize, x as usize))
            .and_then(|(az, x)| self.gain(az, x))
    }

    pub fn has_azimuth(&self) -> bool {
        self.has_azimuth
    }

    pub fn has_elevation(&self) -> bool {
        self.has_elevation
    }
}

impl fmt::Debug for AntennaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AntennaPattern")
            .field("has_azimuth", &self.has_azimuth)
            .field("has_elevation", &self.has_elevation)
            .finish_non_exhaustive()
    }
}

pub struct AntennaPatternBuilder {
    azimuth: Option<AzimuthPattern>,
    elevation: Option<ElevationPattern>,
}

impl AntennaPatternBuilder {
    #[must_use]
    pub fn azimuth(mut self, pattern: AzimuthPattern) -> Self {
        self.azimuth = Some(pattern);
        self
    }

    #[must_use]
    pub fn elevation(mut self, pattern: ElevationPattern) -> Self {
        self.elevation = Some(pattern);
        self
    }

    /// Builds the gain table. A missing component contributes unity
    /// gain; at least one must be present.
    pub fn build(&self) -> Result<AntennaPattern, PropahError> {
        if self.azimuth.is_none() && self.elevation.is_none() {
            return Err(PropahError::Builder("azimuth or elevation"));
        }
        let azimuth = self.azimuth.as_ref().map(azimuth_gains);
        let elevation = self.elevation.as_ref().map(elevation_gains);

        let mut gains = vec![1.0_f32; AZIMUTH_SLOTS * ELEVATION_SLOTS];
        for (x, row) in gains.chunks_exact_mut(ELEVATION_SLOTS).enumerate() {
            for (y, gain) in row.iter_mut().enumerate() {
                let az = azimuth.as_ref().map_or(1.0, |az| az[x]);
                let el = elevation
                    .as_ref()
                    .map_or(1.0, |el| el[x * ELEVATION_SLOTS + y]);
                *gain = az * el;
            }
        }

        Ok(AntennaPattern {
            gains: gains.into_boxed_slice(),
            has_azimuth: azimuth.is_some(),
            has_elevation: elevation.is_some(),
        })
    }
}

/// Sums `samples` into `len` slots. Returns the sums and the number
/// of samples landing in each slot.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn accumulate<F>(samples: &[(f64, f64)], len: usize, slot: F) -> (Vec<f32>, Vec<u32>)
where
    F: Fn(f32) -> f32,
{
    let mut values = vec![0.0_f32; len];
    let mut counts = vec![0_u32; len];
    for &(angle, amplitude) in samples {
        let x = slot(angle as f32).round_ties_even();
        if x >= 0.0 && x <= (len - 1) as f32 {
            values[x as usize] += amplitude as f32;
            counts[x as usize] += 1;
        }
    }
    (values, counts)
}

#[allow(clippy::cast_precision_loss)]
fn average(values: &mut [f32], counts: &[u32]) {
    for (value, &count) in values.iter_mut().zip(counts) {
        if count > 1 {
            *value /= count as f32;
        }
    }
}

/// Fills slots between populated ones by linear interpolation. Slots
/// before the first or after the last populated one are untouched.
#[allow(clippy::cast_precision_loss)]
fn interpolate(values: &mut [f32], counts: &[u32]) {
    let mut last = None;
    for next in 0..values.len() {
        if counts[next] == 0 {
            continue;
        }
        if let Some(last) = last {
            let delta = (values[next] - values[last]) / (next - last) as f32;
            for y in last + 1..next {
                values[y] = values[y - 1] + delta;
            }
        }
        last = Some(next);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn azimuth_gains(pattern: &AzimuthPattern) -> Vec<f32> {
    let (mut azimuth, mut counts) = accumulate(&pattern.samples, AZIMUTH_SLOTS, |az| az);

    // 0 and 360 are the same direction.
    if counts[0] == 0 && counts[360] != 0 {
        counts[0] = counts[360];
        azimuth[0] = azimuth[360];
    }
    if counts[0] != 0 && counts[360] == 0 {
        counts[360] = counts[0];
        azimuth[360] = azimuth[0];
    }

    average(&mut azimuth, &counts);
    interpolate(&mut azimuth, &counts);

    let rotation = (pattern.rotation as f32).round_ties_even() as i32;
    let mut rotated = vec![0.0_f32; AZIMUTH_SLOTS];
    for (x, &value) in azimuth.iter().enumerate().take(360) {
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let y = (x as i32 + rotation).rem_euclid(360) as usize;
        rotated[y] = value;
    }
    rotated[360] = rotated[0];
    rotated
}

/// Returns the elevation table, `AZIMUTH_SLOTS` rows of
/// `ELEVATION_SLOTS`, with mechanical tilt applied per azimuth.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn elevation_gains(pattern: &ElevationPattern) -> Vec<f32> {
    let (mut fine, counts) = accumulate(&pattern.samples, FINE_ELEVATION_SLOTS, |el| {
        100.0 * (el + 10.0)
    });
    average(&mut fine, &counts);
    interpolate(&mut fine, &counts);

    let tilt = pattern.tilt as f32;
    let tilt_azimuth = pattern.tilt_azimuth as f32;
    let mut slant = [0.0_f32; AZIMUTH_SLOTS];
    if tilt != 0.0 {
        let increment = tilt / 90.0;
        for x in 0..AZIMUTH_SLOTS {
            let xx = x as f32;
            let y = ((tilt_azimuth + xx).round_ties_even() as i32).rem_euclid(360) as usize;
            slant[y] = if x <= 180 {
                -(increment * (90.0 - xx))
            } else {
                -(increment * (xx - 270.0))
            };
        }
    }
    slant[360] = slant[0];

    let max = (FINE_ELEVATION_SLOTS - 1) as i64;
    let mut table = vec![0.0_f32; AZIMUTH_SLOTS * ELEVATION_SLOTS];
    for (row, &slant) in table.chunks_exact_mut(ELEVATION_SLOTS).zip(slant.iter()) {
        let offset = (100.0 * slant).round_ties_even() as i64;
        for (z, gain) in row.iter_mut().enumerate() {
            let x = offset + 10 * z as i64;
            let sum: f32 = (x..x + 10).map(|b| fine[b.clamp(0, max) as usize]).sum();
            *gain = sum / 10.0;
        }
    }
    table
}
