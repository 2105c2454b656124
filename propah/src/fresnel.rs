use num_traits::{AsPrimitive, Float};

/// Speed of light in feet per second, as used for wavelengths in
/// feet.
pub const C_FEET: f64 = 9.8425e8;

/// Returns the wavelength (feet) of a signal at `frequency` MHz.
pub fn wavelength_feet(frequency: f64) -> f64 {
    C_FEET / (frequency * 1e6)
}

/// Returns the radius of the nth fresnel zone `d1` along a path of
/// length `distance`, in the unit of `wavelength`.
pub fn zone_radius<T: Float>(zone: T, wavelength: T, d1: T, distance: T) -> T {
    (zone * wavelength * d1 * (distance - d1) / distance).sqrt()
}

/// Represents the lower nth fresnel zone of a radio link.
#[derive(Debug)]
pub struct FresnelZone<T> {
    /// Which fresnel zone we're interested in.
    zone: u8,
    wavelength: T,
    distance: T,
}

impl<T> FresnelZone<T> {
    /// Returns a new FresnelZone object, with `distance` in the same
    /// unit as `wavelength`.
    pub fn with_wavelength(zone: u8, wavelength: T, distance: T) -> Self {
        Self {
            zone,
            wavelength,
            distance,
        }
    }

    /// Returns the zone's radius `d1` from the start of the link.
    pub fn radius(&self, d1: T) -> T
    where
        T: Float + 'static,
        u8: AsPrimitive<T>,
    {
        zone_radius(self.zone.as_(), self.wavelength, d1, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::{wavelength_feet, zone_radius, FresnelZone};
    use approx::assert_relative_eq;

    #[test]
    fn test_feet() {
        // 100 MHz is just under 10 feet.
        assert_relative_eq!(wavelength_feet(100.0), 9.8425);
        let zone = FresnelZone::with_wavelength(1, wavelength_feet(100.0), 5280.0);
        assert_relative_eq!(
            zone.radius(2640.0),
            zone_radius(1.0, 9.8425, 2640.0, 5280.0)
        );
        assert_relative_eq!(zone.radius(2640.0), (9.8425_f64 * 1320.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_zones_pinch_at_endpoints() {
        let first = FresnelZone::with_wavelength(1, 1.0_f64, 1000.0);
        let second = FresnelZone::with_wavelength(2, 1.0_f64, 1000.0);
        assert_relative_eq!(first.radius(0.0), 0.0);
        assert_relative_eq!(first.radius(1000.0), 0.0);
        assert_relative_eq!(first.radius(500.0), 250.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(second.radius(500.0), 500.0_f64.sqrt(), epsilon = 1e-12);
    }
}
