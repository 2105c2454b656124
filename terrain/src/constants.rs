//! Physical constants and unit conversions.

/// Mean earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Mean earth radius in feet.
pub const EARTH_RADIUS_FEET: f64 = 20_902_230.97;

/// Effective earth radius multiplier for standard atmospheric
/// refraction.
pub const FOUR_THIRDS: f64 = 1.333_333_333_333_3;

pub const FEET_PER_MILE: f64 = 5280.0;
pub const FEET_PER_METER: f64 = 3.280_84;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_MILE: f64 = 1609.344;
pub const KM_PER_MILE: f64 = 1.609_344;
