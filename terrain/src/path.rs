use crate::{
    constants::EARTH_RADIUS_MILES,
    math::{azimuth, distance, sail},
    Site, TileStore,
};
use std::ops::Index;

/// One sample of a [Path].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Degrees north.
    pub lat: f64,

    /// Degrees west.
    pub lon: f64,

    /// Ground elevation (feet), or
    /// [NO_ELEVATION](crate::NO_ELEVATION).
    pub elevation: f64,

    /// Distance from the start of the path (miles).
    pub distance: f64,
}

/// Terrain sampled along the great circle between two sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    samples: Vec<PathSample>,

    /// `true` if the path hit the store's sample cap.
    truncated: bool,
}

impl Path {
    /// Samples the great circle from `source` to `destination`.
    ///
    /// Sample spacing follows the store's resolution. The first sample
    /// sits on `source` and the last on `destination`, unless the
    /// sites are within half a pixel of each other, in which case the
    /// path is the single `source` sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(store: &TileStore, source: &Site, destination: &Site) -> Self {
        let resolution = store.resolution();
        let capacity = store.config().path_capacity();
        let total_distance = distance(source, destination);

        if total_distance <= 30.0 / resolution.ppd() {
            return Self {
                samples: vec![PathSample {
                    lat: source.lat,
                    lon: source.lon,
                    elevation: store.elevation(source.lat, source.lon),
                    distance: 0.0,
                }],
                truncated: false,
            };
        }

        let (lat1, lon1) = (source.lat.to_radians(), source.lon.to_radians());
        let (lat2, lon2) = (destination.lat.to_radians(), destination.lon.to_radians());
        let azimuth = azimuth(source, destination).to_radians();

        let samples_per_radian = resolution.samples_per_radian();
        let dx = samples_per_radian * (lon1 - lon2).cos().acos();
        let dy = samples_per_radian * (lat1 - lat2).cos().acos();
        let path_length = dx.hypot(dy);
        let miles_per_sample = total_distance / path_length;

        let mut samples = Vec::with_capacity((path_length as usize + 2).min(capacity));
        let mut step_distance = 0.0;
        while step_distance <= total_distance && samples.len() < capacity {
            let (lat, lon) = if samples.is_empty() {
                (source.lat, source.lon)
            } else {
                sail(lat1, lon1, azimuth, step_distance / EARTH_RADIUS_MILES)
            };
            samples.push(PathSample {
                lat,
                lon,
                elevation: store.elevation(lat, lon),
                distance: step_distance,
            });
            step_distance = miles_per_sample * samples.len() as f64;
        }

        if samples.len() < capacity {
            samples.push(PathSample {
                lat: destination.lat,
                lon: destination.lon,
                elevation: store.elevation(destination.lat, destination.lon),
                distance: total_distance,
            });
        }

        let truncated = samples.len() >= capacity;
        if truncated {
            samples.truncate(capacity - 1);
        }

        Self { samples, truncated }
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `true` if the path was cut short by the sample cap, in
    /// which case the last sample is not the destination.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn first(&self) -> Option<&PathSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&PathSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSample> {
        self.samples.iter()
    }
}

impl Index<usize> for Path {
    type Output = PathSample;

    fn index(&self, idx: usize) -> &PathSample {
        &self.samples[idx]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSample;
    type IntoIter = std::slice::Iter<'a, PathSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
