//! Query rectangles and their cache-stable normal form.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, GeoPoint};

/// Decimal places kept by [`BoundingBox::normalize`].  Boxes that agree to
/// this many places share a cache entry.
pub const NORMALIZE_DECIMALS: i32 = 5;

/// A north/south/east/west rectangle in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east:  f64,
    pub west:  f64,
}

impl BoundingBox {
    /// Validate ranges: latitudes in [-90, 90], longitudes in [-180, 180].
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> CoreResult<Self> {
        check_range("north", north, 90.0)?;
        check_range("south", south, 90.0)?;
        check_range("east", east, 180.0)?;
        check_range("west", west, 180.0)?;
        Ok(Self { north, south, east, west })
    }

    /// Round all four fields to [`NORMALIZE_DECIMALS`] places.
    pub fn normalize(&self) -> Self {
        Self {
            north: round_to(self.north),
            south: round_to(self.south),
            east:  round_to(self.east),
            west:  round_to(self.west),
        }
    }

    /// `"n,s,e,w"` over the normalised values.  Integral values keep a
    /// trailing `.0` so `-74` and `-74.0` cannot diverge.
    pub fn canonical_string(&self) -> String {
        let n = self.normalize();
        format!("{:?},{:?},{:?},{:?}", n.north, n.south, n.east, n.west)
    }

    /// `true` if `p` lies inside or on the border of the box.
    pub fn contains(&self, p: GeoPoint) -> bool {
        let (lo_lat, hi_lat) = min_max(self.south, self.north);
        let (lo_lon, hi_lon) = min_max(self.west, self.east);
        (lo_lat..=hi_lat).contains(&p.lat) && (lo_lon..=hi_lon).contains(&p.lon)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[N {:.5}, S {:.5}, E {:.5}, W {:.5}]",
            self.north, self.south, self.east, self.west
        )
    }
}

fn check_range(field: &'static str, value: f64, limit: f64) -> CoreResult<()> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange { field, value, min: -limit, max: limit })
    }
}

/// Rounds to [`NORMALIZE_DECIMALS`] places.  Adding `0.0` folds `-0.0`
/// into `0.0`, so values rounding to zero from either side format alike.
fn round_to(v: f64) -> f64 {
    let scale = 10f64.powi(NORMALIZE_DECIMALS);
    (v * scale).round() / scale + 0.0
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
