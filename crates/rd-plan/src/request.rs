//! Planner inputs and outputs.

use serde::{Deserialize, Serialize};

use rd_cache::CacheKey;
use rd_core::{BoundingBox, GeoPoint, NodeId};
use rd_dispatch::SurvivorGroup;
use rd_graph::{EdgeModification, PointKind, PointRequest, RoadGraph};

use crate::{PlanError, PlanResult};

/// One routing call: an area, the reported points, and operator edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub bbox:  BoundingBox,
    pub nodes: Vec<PointRequest>,
    #[serde(default)]
    pub modified_edges: Vec<EdgeModification>,
}

impl RouteRequest {
    pub fn new(bbox: BoundingBox, nodes: Vec<PointRequest>) -> Self {
        Self { bbox, nodes, modified_edges: Vec::new() }
    }

    pub fn with_edits(mut self, edits: Vec<EdgeModification>) -> Self {
        self.modified_edges = edits;
        self
    }

    /// Reject malformed points and requests with no pickup.
    pub fn validate(&self) -> PlanResult<()> {
        for point in &self.nodes {
            point.validate()?;
        }
        if !self.nodes.iter().any(|p| p.kind == PointKind::Pickup) {
            return Err(PlanError::InvalidRequest("no pickup points supplied".into()));
        }
        Ok(())
    }
}

/// One vehicle's route, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// Index of the vehicle's pickup among the request's pickup points
    /// (after deduplication).
    pub vehicle: usize,
    pub nodes:   Vec<NodeId>,
    /// Road shape followed by the route, `(lon, lat)` order when exported.
    pub coordinates: Vec<GeoPoint>,
    pub cost: f64,
}

/// Result of [`Planner::plan_routes`](crate::Planner::plan_routes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Cache key of the area, usable as a session id.
    pub session: CacheKey,
    /// Directed graph with the request's edits and points applied.
    pub display_graph: RoadGraph,
    pub routes: Vec<PlannedRoute>,
    /// Survivor groups no vehicle could reach.
    pub unassigned: Vec<SurvivorGroup>,
}
