//! Encoding of path loss results into one byte per grid cell.

/// Quantity a path loss sweep writes to the signal grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputQuantity {
    /// Path loss (dB), stored as is.
    PathLoss,

    /// Field strength (dBµV/m), stored offset by 100.
    FieldStrength,

    /// Received power (dBm), stored offset by 200.
    PowerLevel,
}

impl OutputQuantity {
    /// Path loss when no power is radiated, otherwise field strength
    /// unless `power_level` asks for received power.
    pub fn from_params(erp: f64, power_level: bool) -> Self {
        match (erp == 0.0, power_level) {
            (true, _) => Self::PathLoss,
            (false, true) => Self::PowerLevel,
            (false, false) => Self::FieldStrength,
        }
    }

    /// Returns this quantity for a path with `loss` dB of attenuation,
    /// at `frequency` MHz and `erp` watts.
    pub fn value(self, loss: f64, frequency: f64, erp: f64) -> f64 {
        match self {
            Self::PathLoss => loss,
            Self::FieldStrength => field_strength(loss, frequency, erp),
            Self::PowerLevel => power_level(loss, erp),
        }
    }

    /// Returns the grid byte for `value`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode(self, value: f64) -> u8 {
        let offset = match self {
            Self::PathLoss => 0.0,
            Self::FieldStrength => 100.0,
            Self::PowerLevel => 200.0,
        };
        (offset + value.round_ties_even()).clamp(0.0, 255.0) as u8
    }

    /// Combines a newly computed byte with what a cell already holds.
    ///
    /// Loss keeps the smaller of the two, treating an existing zero as
    /// empty. Field strength and power keep the larger.
    pub fn merge(self, existing: u8, new: u8) -> u8 {
        match self {
            Self::PathLoss if existing != 0 => existing.min(new),
            Self::PathLoss => new,
            Self::FieldStrength | Self::PowerLevel => existing.max(new),
        }
    }
}

/// Field strength (dBµV/m) for `loss` dB at `frequency` MHz and `erp`
/// watts.
pub fn field_strength(loss: f64, frequency: f64, erp: f64) -> f64 {
    139.4 + 20.0 * frequency.log10() - loss + 10.0 * (erp / 1000.0).log10()
}

/// Received power (dBm) for `loss` dB and `erp` watts, relative to an
/// isotropic receive antenna.
pub fn power_level(loss: f64, erp: f64) -> f64 {
    // EIRP is ERP + 2.14 dB.
    let watts = erp / 10_f64.powf((loss - 2.14) / 10.0);
    10.0 * (watts * 1000.0).log10()
}
