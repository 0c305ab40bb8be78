//! Geographic coordinate type and great-circle distance.
//!
//! Unlike a city-scale simulation, edge splitting needs sub-metre
//! consistency between projected and interpolated positions, so
//! coordinates are stored as `f64`.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 coordinate.  `x` is longitude and `y` is latitude wherever the
/// road graph talks in planar terms.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from planar `(x, y)` = `(lon, lat)` order.
    #[inline]
    pub fn from_xy(x: f64, y: f64) -> Self {
        Self { lat: y, lon: x }
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.lat
    }

    /// `[x, y]` pair for spatial indexing.
    #[inline]
    pub fn xy(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Squared planar distance in degree space.  Only meaningful for
    /// comparisons, e.g. deciding which end of a polyline is closer.
    #[inline]
    pub fn planar_dist2(self, other: GeoPoint) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
