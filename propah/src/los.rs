//! Line-of-sight analysis.
//!
//! Elevation angles are compared through their cosines: for a
//! triangle formed by the earth's center, an observer, and a target,
//! a larger cosine at the observer means a lower target. Samples at
//! sea level are never raised by clutter, and neither are the two
//! path endpoints.

use terrain::{
    constants::FEET_PER_MILE, math::distance, Path, PathSample, Site, TileStore,
};

/// Cosine of the angle at an observer `observer` feet from the earth's
/// center, between the earth's center and a target `target` feet from
/// the center and `distance` feet from the observer.
#[inline]
pub(crate) fn cos_angle(observer: f64, distance: f64, target: f64) -> f64 {
    (observer * observer + distance * distance - target * target) / (2.0 * observer * distance)
}

/// Terrain height of `sample` with `clutter` on top, unless it is at
/// sea level.
#[inline]
pub(crate) fn cluttered(sample: &PathSample, clutter: f64) -> f64 {
    if sample.elevation == 0.0 {
        sample.elevation
    } else {
        sample.elevation + clutter
    }
}

/// Returns `true` if a receiver `rx_alt` feet above the ground at
/// `path[y]` can see a transmitter `tx_alt` feet above `path[0]`.
fn is_visible(path: &Path, y: usize, tx_alt: f64, rx_alt: f64, clutter: f64, earth_radius: f64) -> bool {
    let samples = path.samples();
    let tx = earth_radius + tx_alt + samples[0].elevation;
    let rx = earth_radius + rx_alt + samples[y].elevation;
    let cos_xmtr = cos_angle(rx, FEET_PER_MILE * samples[y].distance, tx);

    // Both antennas stand on bare ground.
    !(0..=y).rev().any(|x| {
        let dist = FEET_PER_MILE * (samples[y].distance - samples[x].distance);
        let ground = if x == 0 || x == y {
            samples[x].elevation
        } else {
            cluttered(&samples[x], clutter)
        };
        let test = earth_radius + ground;
        cos_xmtr >= cos_angle(rx, dist, test)
    })
}

/// Returns the index of every sample of `path` from which a receiver
/// `rx_alt` feet above ground sees a transmitter `tx_alt` feet above
/// the path's first sample.
pub fn visible_samples(
    path: &Path,
    tx_alt: f64,
    rx_alt: f64,
    clutter: f64,
    earth_radius: f64,
) -> Vec<usize> {
    (0..path.len())
        .filter(|&y| is_visible(path, y, tx_alt, rx_alt, clutter, earth_radius))
        .collect()
}

/// Marks `layer` in the mask of every cell on the path from `source`
/// to `destination` that has line of sight to `source`, for a
/// receiver at `destination`'s antenna height.
///
/// Cells already carrying `layer` are not retested. Returns the
/// number of cells newly marked.
pub fn plot_path(
    store: &mut TileStore,
    source: &Site,
    destination: &Site,
    layer: u8,
    clutter: f64,
    earth_radius: f64,
) -> usize {
    let path = Path::new(store, source, destination);
    let mut marked = 0;
    for (y, sample) in path.iter().enumerate() {
        if store.mask(sample.lat, sample.lon) & layer != 0 {
            continue;
        }
        if is_visible(&path, y, source.alt, destination.alt, clutter, earth_radius)
            && store.or_mask(sample.lat, sample.lon, layer).is_some()
        {
            marked += 1;
        }
    }
    marked
}

/// Angle to a destination, or to whatever blocks it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationAngle {
    /// Degrees above the source's horizontal.
    pub angle: f64,

    /// The first sample obstructing the view, with its index on the
    /// path.
    pub obstruction: Option<(usize, PathSample)>,
}

/// Returns the elevation angle of `destination` as seen from
/// `source`, or, if terrain is in the way, the angle of the first
/// obstruction.
pub fn first_obstruction(
    store: &TileStore,
    source: &Site,
    destination: &Site,
    earth_radius: f64,
    clutter: f64,
) -> ElevationAngle {
    let path = Path::new(store, source, destination);
    let src = earth_radius + source.alt + store.elevation(source.lat, source.lon);
    let dest = earth_radius + destination.alt + store.elevation(destination.lat, destination.lon);
    let cos_xmtr = cos_angle(src, FEET_PER_MILE * distance(source, destination), dest);

    path.iter()
        .enumerate()
        .skip(2)
        .find_map(|(x, sample)| {
            let test = earth_radius + cluttered(sample, clutter);
            let cos_test = cos_angle(src, FEET_PER_MILE * sample.distance, test);
            (cos_xmtr >= cos_test).then(|| ElevationAngle {
                angle: cos_test.acos().to_degrees() - 90.0,
                obstruction: Some((x, *sample)),
            })
        })
        .unwrap_or(ElevationAngle {
            angle: cos_xmtr.acos().to_degrees() - 90.0,
            obstruction: None,
        })
}
