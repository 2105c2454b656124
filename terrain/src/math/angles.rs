/// Returns the short path longitudinal difference `lon1 - lon2` in
/// degrees, in `(-180, 180]`.
///
/// The result is positive when `lon1` is west of `lon2`.
pub fn lon_diff(lon1: f64, lon2: f64) -> f64 {
    let diff = (lon1 - lon2).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Normalizes `angle` (degrees) to whole degrees in `[0, 180]`.
#[allow(clippy::cast_possible_truncation)]
pub fn reduce_angle(angle: f64) -> i32 {
    angle.to_radians().cos().acos().to_degrees().round_ties_even() as i32
}

#[cfg(test)]
mod tests {
    use super::{lon_diff, reduce_angle};
    use approx::assert_relative_eq;

    #[test]
    fn test_lon_diff() {
        assert_relative_eq!(lon_diff(72.0, 71.0), 1.0);
        assert_relative_eq!(lon_diff(71.0, 72.0), -1.0);
        assert_relative_eq!(lon_diff(1.0, 359.0), 2.0);
        assert_relative_eq!(lon_diff(359.0, 1.0), -2.0);
        assert_relative_eq!(lon_diff(180.0, 0.0), 180.0);
        assert_relative_eq!(lon_diff(0.0, 180.0), 180.0);
        assert_relative_eq!(lon_diff(42.5, 42.5), 0.0);
    }

    #[test]
    fn test_lon_diff_range() {
        let mut lon1 = -720.0;
        while lon1 <= 720.0 {
            let mut lon2 = 0.0;
            while lon2 < 360.0 {
                let diff = lon_diff(lon1, lon2);
                assert!(diff > -180.0 && diff <= 180.0, "{lon1} {lon2} {diff}");
                lon2 += 7.25;
            }
            lon1 += 3.5;
        }
    }

    #[test]
    fn test_reduce_angle() {
        assert_eq!(reduce_angle(0.0), 0);
        assert_eq!(reduce_angle(90.0), 90);
        assert_eq!(reduce_angle(270.0), 90);
        assert_eq!(reduce_angle(-3.0), 3);
        assert_eq!(reduce_angle(359.0), 1);
        assert_eq!(reduce_angle(180.0), 180);
    }
}
