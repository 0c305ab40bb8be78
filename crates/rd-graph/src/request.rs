//! Reported points of interest and their pre-integration clean-up.

use serde::{Deserialize, Serialize};

use rd_core::{CoreError, CoreResult, GeoPoint, NodeId};

/// What a reported point represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// A group of people awaiting rescue.
    Survivor,
    /// A vehicle base: routes start and end at pickups.
    Pickup,
}

/// A point to place on the road graph.  `x` is longitude, `y` latitude.
///
/// Survivors must carry both `urgency` and `count`, and they may not both
/// be 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRequest {
    pub id:   i64,
    pub x:    f64,
    pub y:    f64,
    #[serde(rename = "type")]
    pub kind: PointKind,
    #[serde(default)]
    pub urgency: Option<u32>,
    #[serde(default)]
    pub count:   Option<u32>,
}

impl PointRequest {
    pub fn survivor(id: i64, pos: GeoPoint, urgency: u32, count: u32) -> Self {
        Self {
            id,
            x: pos.x(),
            y: pos.y(),
            kind: PointKind::Survivor,
            urgency: Some(urgency),
            count: Some(count),
        }
    }

    pub fn pickup(id: i64, pos: GeoPoint) -> Self {
        Self { id, x: pos.x(), y: pos.y(), kind: PointKind::Pickup, urgency: None, count: None }
    }

    #[inline]
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::from_xy(self.x, self.y)
    }

    pub fn is_survivor(&self) -> bool {
        self.kind == PointKind::Survivor
    }

    /// Check coordinate ranges and the survivor invariant.
    ///
    /// A survivor with urgency and count both 0 has no dispatch priority
    /// and is rejected here rather than at dispatch.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.y.is_finite() && (-90.0..=90.0).contains(&self.y)) {
            return Err(CoreError::OutOfRange { field: "y", value: self.y, min: -90.0, max: 90.0 });
        }
        if !(self.x.is_finite() && (-180.0..=180.0).contains(&self.x)) {
            return Err(CoreError::OutOfRange { field: "x", value: self.x, min: -180.0, max: 180.0 });
        }
        if self.is_survivor() && (self.urgency.is_none() || self.count.is_none()) {
            return Err(CoreError::InvalidRequest(format!(
                "survivor point {} requires both urgency and count",
                self.id
            )));
        }
        if self.is_survivor() && self.urgency == Some(0) && self.count == Some(0) {
            return Err(CoreError::InvalidRequest(format!(
                "survivor point {} has zero urgency and zero count",
                self.id
            )));
        }
        Ok(())
    }
}

/// A request resolved to a graph node.  Several requests may share a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnappedNode {
    pub node:    NodeId,
    pub request: PointRequest,
}

// ── Deduplication ─────────────────────────────────────────────────────────────

/// Merge radius for [`deduplicate`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DedupPolicy {
    /// Points strictly closer than this many metres merge.
    pub radius_m: f64,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self { radius_m: 10.0 }
    }
}

/// Collapse near-duplicate reports, in input order.
///
/// Each point merges into the first already-kept point of the same kind
/// lying within `policy.radius_m`; otherwise it is kept as-is.  Merged
/// survivors take the larger urgency (a missing one counts as 0) and the
/// summed count.  Merged pickups simply keep the first report.
///
/// Pickups and survivors never merge with each other: a pickup carries no
/// urgency or count, and a merge would turn a vehicle base into a survivor
/// group or swallow a survivor into a base.
pub fn deduplicate(points: &[PointRequest], policy: &DedupPolicy) -> Vec<PointRequest> {
    let mut kept: Vec<PointRequest> = Vec::with_capacity(points.len());

    for point in points {
        let pos = point.pos();
        let twin = kept
            .iter_mut()
            .find(|k| k.kind == point.kind && k.pos().distance_m(pos) < policy.radius_m);

        match twin {
            Some(k) if k.is_survivor() => {
                k.urgency = Some(k.urgency.unwrap_or(0).max(point.urgency.unwrap_or(0)));
                k.count = Some(k.count.unwrap_or(0) + point.count.unwrap_or(0));
            }
            Some(_) => {}
            None => kept.push(point.clone()),
        }
    }
    kept
}
