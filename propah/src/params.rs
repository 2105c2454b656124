use crate::{antenna::AntennaPattern, PropahError};
use std::fmt;

/// Antenna polarization.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    Horizontal = 0,
    Vertical = 1,
}

impl TryFrom<i32> for Polarization {
    type Error = PropahError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            _ => Err(PropahError::Polarization(code)),
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("Horizontal"),
            Self::Vertical => f.write_str("Vertical"),
        }
    }
}

/// Radio climate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Climate {
    Equatorial = 1,
    ContinentalSubtropical = 2,
    MaritimeSubtropical = 3,
    Desert = 4,
    ContinentalTemperate = 5,
    MaritimeTemperateOverLand = 6,
    MaritimeTemperateOverSea = 7,
}

impl TryFrom<i32> for Climate {
    type Error = PropahError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::Equatorial,
            2 => Self::ContinentalSubtropical,
            3 => Self::MaritimeSubtropical,
            4 => Self::Desert,
            5 => Self::ContinentalTemperate,
            6 => Self::MaritimeTemperateOverLand,
            7 => Self::MaritimeTemperateOverSea,
            _ => return Err(PropahError::Climate(code)),
        })
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equatorial => "Equatorial",
            Self::ContinentalSubtropical => "Continental Subtropical",
            Self::MaritimeSubtropical => "Maritime Subtropical",
            Self::Desert => "Desert",
            Self::ContinentalTemperate => "Continental Temperate",
            Self::MaritimeTemperateOverLand => "Maritime Temperate (Land)",
            Self::MaritimeTemperateOverSea => "Maritime Temperate (Sea)",
        };
        f.write_str(name)
    }
}

/// Everything a point-to-point model needs besides terrain, plus
/// the transmitter's power and antenna.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationParameters {
    /// Earth dielectric constant (relative permittivity).
    pub dielectric: f64,

    /// Earth conductivity (Siemens per meter).
    pub conductivity: f64,

    /// Atmospheric bending constant (N-units).
    pub refractivity: f64,

    /// Frequency (MHz).
    pub frequency: f64,

    pub climate: Climate,

    pub polarization: Polarization,

    /// Fraction of situations, in `(0, 1)`.
    pub confidence: f64,

    /// Fraction of time, in `(0, 1)`.
    pub reliability: f64,

    /// Effective radiated power (watts). Zero selects path loss
    /// output.
    pub erp: f64,

    /// Normalized transmit antenna gain, if known.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pattern: Option<AntennaPattern>,
}

impl Default for PropagationParameters {
    fn default() -> Self {
        Self {
            dielectric: 15.0,
            conductivity: 0.005,
            refractivity: 301.0,
            frequency: 300.0,
            climate: Climate::ContinentalTemperate,
            polarization: Polarization::Horizontal,
            confidence: 0.5,
            reliability: 0.5,
            erp: 0.0,
            pattern: None,
        }
    }
}

impl PropagationParameters {
    /// Returns `true` if an elevation pattern makes the angle to the
    /// first obstruction relevant.
    pub fn has_elevation_pattern(&self) -> bool {
        self.pattern.as_ref().is_some_and(AntennaPattern::has_elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::{Climate, Polarization, PropagationParameters};

    #[test]
    fn test_codes() {
        assert_eq!(Climate::try_from(5).unwrap(), Climate::ContinentalTemperate);
        assert!(Climate::try_from(0).is_err());
        assert!(Climate::try_from(8).is_err());
        assert_eq!(Polarization::try_from(1).unwrap(), Polarization::Vertical);
        assert!(Polarization::try_from(2).is_err());
        assert_eq!(Climate::Desert as i32, 4);
    }

    #[test]
    fn test_defaults() {
        let params = PropagationParameters::default();
        assert_eq!(params.climate, Climate::ContinentalTemperate);
        assert_eq!(params.polarization, Polarization::Horizontal);
        assert!(params.erp == 0.0);
        assert!(!params.has_elevation_pattern());
    }
}
