//! Ordered coordinate sequences describing the shape of a road segment.
//!
//! # Distance units
//!
//! Projection, interpolation and substring all work in **planar degree
//! space**, treating `(lon, lat)` as Cartesian `(x, y)`.  This keeps a point
//! projected onto a curve and the point interpolated back from that
//! distance consistent with each other.  Physical lengths in metres come
//! from [`Polyline::haversine_length`] or from great-circle distance between
//! endpoints.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, GeoPoint};

/// A polyline with at least two vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Wrap `points`, rejecting sequences shorter than two vertices.
    pub fn new(points: Vec<GeoPoint>) -> CoreResult<Self> {
        if points.len() < 2 {
            return Err(CoreError::DegeneratePolyline(points.len()));
        }
        Ok(Self { points })
    }

    /// Straight segment from `a` to `b`.
    pub fn straight(a: GeoPoint, b: GeoPoint) -> Self {
        Self { points: vec![a, b] }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn first(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn last(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Iterator over consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Same vertices in the opposite order.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Reverse if the last vertex is closer to `start` than the first one.
    pub fn oriented_from(self, start: GeoPoint) -> Self {
        if start.planar_dist2(self.last()) < start.planar_dist2(self.first()) {
            self.reversed()
        } else {
            self
        }
    }

    /// Length in planar degree units.
    pub fn planar_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.planar_dist2(b).sqrt()).sum()
    }

    /// Sum of great-circle segment lengths in metres.
    pub fn haversine_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_m(b)).sum()
    }

    /// Distance along the curve to the point on it nearest to `p`.
    ///
    /// When two segments are equally close the earlier one wins.
    pub fn project(&self, p: GeoPoint) -> f64 {
        let mut best_dist2 = f64::INFINITY;
        let mut best_along = 0.0;
        let mut walked = 0.0;

        for (a, b) in self.segments() {
            let seg_len = a.planar_dist2(b).sqrt();
            let t = segment_param(a, b, p);
            let foot = lerp(a, b, t);
            let d2 = foot.planar_dist2(p);
            if d2 < best_dist2 {
                best_dist2 = d2;
                best_along = walked + t * seg_len;
            }
            walked += seg_len;
        }
        best_along
    }

    /// Point at `distance` along the curve, clamped to its ends.
    pub fn interpolate(&self, distance: f64) -> GeoPoint {
        if distance <= 0.0 {
            return self.first();
        }
        let mut walked = 0.0;
        for (a, b) in self.segments() {
            let seg_len = a.planar_dist2(b).sqrt();
            if walked + seg_len >= distance {
                if seg_len == 0.0 {
                    return a;
                }
                return lerp(a, b, (distance - walked) / seg_len);
            }
            walked += seg_len;
        }
        self.last()
    }

    /// Part of the curve between `start` and `end` (planar distances along
    /// it), keeping every interior vertex so curvature is preserved.
    ///
    /// Bounds are clamped to `[0, planar_length]` and swapped if reversed.
    /// A zero-length request yields a two-vertex polyline at one point.
    pub fn substring(&self, start: f64, end: f64) -> Self {
        let total = self.planar_length();
        let (mut lo, mut hi) = (start.clamp(0.0, total), end.clamp(0.0, total));
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }

        let mut points = vec![self.interpolate(lo)];
        let mut walked = 0.0;
        for (a, b) in self.segments() {
            walked += a.planar_dist2(b).sqrt();
            if walked > lo && walked < hi {
                points.push(b);
            }
        }
        points.push(self.interpolate(hi));
        Self { points }
    }
}

impl TryFrom<Vec<GeoPoint>> for Polyline {
    type Error = CoreError;
    fn try_from(points: Vec<GeoPoint>) -> CoreResult<Self> {
        Polyline::new(points)
    }
}

impl From<Polyline> for Vec<GeoPoint> {
    fn from(line: Polyline) -> Self {
        line.points
    }
}

/// Parameter in `[0, 1]` of the foot of the perpendicular from `p` onto `ab`.
fn segment_param(a: GeoPoint, b: GeoPoint, p: GeoPoint) -> f64 {
    let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    (((p.x() - a.x()) * dx + (p.y() - a.y()) * dy) / len2).clamp(0.0, 1.0)
}

#[inline]
fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::from_xy(a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t)
}
