use crate::{constants::EARTH_RADIUS_MILES, Site};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Returns the great circle distance, in miles, between `a` and `b`.
#[allow(clippy::float_cmp)]
pub fn distance(a: &Site, b: &Site) -> f64 {
    if a.lat == b.lat && a.lon == b.lon {
        return 0.0;
    }
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    EARTH_RADIUS_MILES * central_angle(lat1, lon1, lat2, lon2)
}

/// Returns the bearing, in degrees clockwise from true north, of
/// `destination` as seen from `source`.
pub fn azimuth(source: &Site, destination: &Site) -> f64 {
    let (src_lat, src_lon) = (source.lat.to_radians(), source.lon.to_radians());
    let (dest_lat, dest_lon) = (destination.lat.to_radians(), destination.lon.to_radians());

    let beta = central_angle(src_lat, src_lon, dest_lat, dest_lon);
    let num = dest_lat.sin() - src_lat.sin() * beta.cos();
    let den = src_lat.cos() * beta.sin();
    let fraction = (num / den).clamp(-1.0, 1.0);
    let mut azimuth = fraction.acos();

    // Longitudes increase westward.
    let mut diff = dest_lon - src_lon;
    if diff <= -PI {
        diff += TAU;
    }
    if diff >= PI {
        diff -= TAU;
    }
    if diff > 0.0 {
        azimuth = TAU - azimuth;
    }

    azimuth.to_degrees()
}

/// Returns the site `miles` away from `source` along the initial
/// bearing `azimuth` (degrees). The returned site has no antenna
/// height or name.
pub fn destination(source: &Site, azimuth: f64, miles: f64) -> Site {
    let (lat, lon) = sail(
        source.lat.to_radians(),
        source.lon.to_radians(),
        azimuth.to_radians(),
        miles / EARTH_RADIUS_MILES,
    );
    Site::new(lat, lon, 0.0)
}

/// Spherical sailing step.
///
/// Starting at (`lat1`, `lon1`) radians, travels the central angle
/// `beta` along initial bearing `azimuth` (radians) and returns the
/// reached (latitude, longitude) in degrees, longitude in `[0, 360]`.
#[allow(clippy::float_cmp)]
pub fn sail(lat1: f64, lon1: f64, azimuth: f64, beta: f64) -> (f64, f64) {
    let lat2 = (lat1.sin() * beta.cos() + azimuth.cos() * beta.sin() * lat1.cos()).asin();
    let num = beta.cos() - lat1.sin() * lat2.sin();
    let den = lat1.cos() * lat2.cos();

    let mut lon2 = if azimuth == 0.0 && beta > FRAC_PI_2 - lat1 {
        // Crossed the north pole.
        lon1 + PI
    } else if azimuth == FRAC_PI_2 && beta > FRAC_PI_2 + lat1 {
        lon1 + PI
    } else if (num / den).abs() > 1.0 {
        lon1
    } else if PI - azimuth >= 0.0 {
        lon1 - arccos(num, den)
    } else {
        lon1 + arccos(num, den)
    };

    while lon2 < 0.0 {
        lon2 += TAU;
    }
    while lon2 > TAU {
        lon2 -= TAU;
    }

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Spherical law of cosines, argument clamped to `[-1, 1]`.
fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Arc cosine of `x / y` in `[0, 2π)`, following the sign of `y`.
fn arccos(x: f64, y: f64) -> f64 {
    if y > 0.0 {
        (x / y).acos()
    } else if y < 0.0 {
        PI + (x / y).acos()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{azimuth, destination, distance};
    use crate::Site;
    use approx::assert_relative_eq;

    fn sites() -> Vec<Site> {
        vec![
            Site::new(44.2705, 71.30325, 0.0),
            Site::new(40.7128, 74.0060, 0.0),
            Site::new(51.4779, 0.0015, 0.0),
            Site::new(-33.8688, 208.7907, 0.0),
            Site::new(0.5, 359.5, 0.0),
            Site::new(-0.5, 0.5, 0.0),
            Site::new(35.0, 106.6, 0.0),
        ]
    }

    #[test]
    fn test_distance_zero_and_symmetric() {
        for a in &sites() {
            assert_relative_eq!(distance(a, a), 0.0);
            for b in &sites() {
                assert_relative_eq!(distance(a, b), distance(b, a), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_distance() {
        // One degree of latitude.
        let a = Site::new(40.0, 75.0, 0.0);
        let b = Site::new(41.0, 75.0, 0.0);
        assert_relative_eq!(distance(&a, &b), 69.097_6, epsilon = 1e-3);
    }

    #[test]
    fn test_azimuth_reciprocal() {
        // Along meridians and the equator the great circle bearing
        // does not change, so forward and back bearings differ by
        // exactly half a turn.
        let pairs = [
            (Site::new(40.0, 75.0, 0.0), Site::new(41.0, 75.0, 0.0)),
            (Site::new(-12.0, 300.0, 0.0), Site::new(-14.5, 300.0, 0.0)),
            (Site::new(0.0, 10.0, 0.0), Site::new(0.0, 11.0, 0.0)),
            (Site::new(0.0, 359.5, 0.0), Site::new(0.0, 0.5, 0.0)),
        ];
        for (a, b) in &pairs {
            let forward = azimuth(a, b);
            let back = azimuth(b, a);
            assert!((0.0..360.0).contains(&forward));
            assert_relative_eq!((back - forward).rem_euclid(360.0), 180.0, epsilon = 1e-4);
        }

        // Short baselines elsewhere agree within convergence of the
        // meridians.
        for a in &sites() {
            let b = destination(a, 60.0, 1.0);
            let diff = (azimuth(&b, a) - azimuth(a, &b)).rem_euclid(360.0);
            assert_relative_eq!(diff, 180.0, epsilon = 0.05);
        }
    }

    #[test]
    fn test_azimuth_cardinal() {
        let origin = Site::new(10.0, 20.0, 0.0);
        // West longitudes decrease toward the east.
        let east = Site::new(10.0, 19.99, 0.0);
        let west = Site::new(10.0, 20.01, 0.0);
        let south = Site::new(9.99, 20.0, 0.0);
        assert_relative_eq!(azimuth(&origin, &east), 90.0, epsilon = 0.01);
        assert_relative_eq!(azimuth(&origin, &west), 270.0, epsilon = 0.01);
        assert_relative_eq!(azimuth(&origin, &south), 180.0, epsilon = 1e-4);
    }

    #[test]
    fn test_destination() {
        let origin = Site::new(44.0, 71.0, 0.0);
        for az in [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0] {
            let dest = destination(&origin, az, 10.0);
            assert_relative_eq!(distance(&origin, &dest), 10.0, epsilon = 1e-6);
            assert_relative_eq!(azimuth(&origin, &dest), az, epsilon = 1e-3);
        }
    }
}
