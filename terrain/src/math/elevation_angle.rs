use super::distance;
use crate::{constants::FEET_PER_MILE, Site, TileStore};
use num_traits::{Float, FloatConst};

/// Returns the up/down angle (in radians) from a point `start_radius`
/// from the center of the earth to a point `end_radius` from the
/// center and `distance` away in a straight line.
///
/// All three lengths must share a unit.
pub fn subtended_angle<T>(start_radius: T, distance: T, end_radius: T) -> T
where
    T: Float + FloatConst,
{
    let a = distance;
    let b = start_radius;
    let c = end_radius;
    let inner = {
        let inner = (a.powi(2) + b.powi(2) - c.powi(2)) / ((T::one() + T::one()) * a * b);
        if inner < -T::one() {
            -T::one()
        } else if inner > T::one() {
            T::one()
        } else {
            inner
        }
    };
    inner.acos() - T::FRAC_PI_2()
}

/// Returns the elevation angle (degrees) of `destination` as seen
/// from `source`, positive for uptilt.
///
/// Both ends stand at ground elevation plus antenna height above an
/// earth of radius `earth_radius` feet.
pub fn elevation_angle(
    store: &TileStore,
    source: &Site,
    destination: &Site,
    earth_radius: f64,
) -> f64 {
    let a = store.elevation(destination.lat, destination.lon) + destination.alt + earth_radius;
    let b = store.elevation(source.lat, source.lon) + source.alt + earth_radius;
    let dx = FEET_PER_MILE * distance(source, destination);
    subtended_angle(b, dx, a).to_degrees()
}
