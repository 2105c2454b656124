use geo::Point;
use std::path::PathBuf;

/// A transmitter or receiver location.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Degrees north.
    pub lat: f64,

    /// Degrees west, in `[0, 360)`.
    pub lon: f64,

    /// Antenna height above ground (feet).
    pub alt: f64,

    /// Display name.
    pub name: String,

    /// File this site was loaded from, if any.
    pub filename: Option<PathBuf>,
}

impl Site {
    /// Returns an unnamed site, normalizing `lon` (degrees west) into
    /// `[0, 360)`.
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            lat,
            lon: lon.rem_euclid(360.0),
            alt,
            name: String::new(),
            filename: None,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_filename(mut self, filename: PathBuf) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Returns an unnamed site from a `geo` point, whose `x` is
    /// degrees _east_.
    pub fn from_point(point: Point<f64>, alt: f64) -> Self {
        Self::new(point.y(), -point.x(), alt)
    }

    /// Returns a `geo` point (degrees east) for this site.
    pub fn to_point(&self) -> Point<f64> {
        let lon_east = if self.lon > 180.0 {
            360.0 - self.lon
        } else {
            -self.lon
        };
        Point::new(lon_east, self.lat)
    }
}

impl From<&Site> for Point<f64> {
    fn from(site: &Site) -> Self {
        site.to_point()
    }
}
