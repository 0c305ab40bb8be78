//! Snapping reported points onto the road graph.
//!
//! For each point the nearest edge (ignoring direction) is found and one of
//! three outcomes applies, in priority order:
//!
//! 1. An endpoint lies within [`SnapPolicy::endpoint_radius_m`]: use it,
//!    checking `u` before `v`.
//! 2. The edge is blocked: use the geodesically nearer endpoint, since no
//!    vehicle could reach a node inserted mid-way along it.
//! 3. Otherwise split the edge at the projected point, split the reverse
//!    direction too if one exists, and use the new node.  If the split
//!    fails, fall back to `u`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rd_core::NodeId;

use crate::graph::{EdgeState, RoadGraph};
use crate::index::EdgeIndex;
use crate::request::{PointRequest, SnappedNode};
use crate::split::split_in_place;
use crate::{GraphError, GraphResult};

/// Distances governing [`integrate_points`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapPolicy {
    /// A point closer than this to an endpoint of its nearest edge snaps to
    /// that endpoint instead of splitting the edge.
    pub endpoint_radius_m: f64,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self { endpoint_radius_m: 50.0 }
    }
}

/// Resolve every point in `points` to a node of `graph`, splitting edges
/// where needed.  Returns one [`SnappedNode`] per input point, in order.
///
/// # Errors
///
/// [`GraphError::NoEdges`] if `graph` has no edges and `points` is not empty.
pub fn integrate_points(
    graph: &mut RoadGraph,
    points: &[PointRequest],
    policy: &SnapPolicy,
) -> GraphResult<Vec<SnappedNode>> {
    let mut index = EdgeIndex::build(graph);
    let mut snapped = Vec::with_capacity(points.len());

    for request in points {
        let pos = request.pos();
        let edge_id = index.nearest_edge(pos).ok_or(GraphError::NoEdges)?;
        let (u, v, key) = graph
            .edge(edge_id)
            .map(|e| (e.u, e.v, e.key))
            .ok_or(GraphError::NoEdges)?;

        let state = effective_state(graph, u, v, key);
        let u_pos = graph.node_pos(u).ok_or(GraphError::NodeNotFound(u))?;
        let v_pos = graph.node_pos(v).ok_or(GraphError::NodeNotFound(v))?;
        let dist_u = pos.distance_m(u_pos);
        let dist_v = pos.distance_m(v_pos);

        let node = if dist_u < policy.endpoint_radius_m {
            u
        } else if dist_v < policy.endpoint_radius_m {
            v
        } else if state == EdgeState::Blocked {
            if dist_u < dist_v { u } else { v }
        } else {
            let inserted = split_indexed(graph, &mut index, u, v, key, request);
            let reverse_key = graph
                .edge_ids_between(v, u)
                .first()
                .and_then(|&id| graph.edge(id))
                .map(|e| e.key);
            if let Some(reverse_key) = reverse_key {
                split_indexed(graph, &mut index, v, u, reverse_key, request);
            }
            inserted.unwrap_or(u)
        };

        debug!(request = request.id, node = node.0, %state, "point snapped");
        snapped.push(SnappedNode { node, request: request.clone() });
    }
    Ok(snapped)
}

/// State of the edge between `u` and `v`: the exact key in either
/// direction, else any parallel edge, else `Clear`.
fn effective_state(graph: &RoadGraph, u: NodeId, v: NodeId, key: u32) -> EdgeState {
    graph
        .find_edge(u, v, key)
        .or_else(|| graph.find_edge(v, u, key))
        .or_else(|| graph.edge_ids_between(u, v).first().copied())
        .or_else(|| graph.edge_ids_between(v, u).first().copied())
        .and_then(|id| graph.edge(id))
        .map_or(EdgeState::Clear, |e| e.state)
}

/// Split and keep `index` in step with the graph.
fn split_indexed(
    graph: &mut RoadGraph,
    index: &mut EdgeIndex,
    u: NodeId,
    v: NodeId,
    key: u32,
    request: &PointRequest,
) -> Option<NodeId> {
    match split_in_place(graph, u, v, key, request.pos()) {
        Ok(split) => {
            let (old_id, old_edge) = &split.removed;
            index.remove(graph, *old_id, old_edge);
            for id in split.halves {
                index.insert(graph, id);
            }
            Some(split.node)
        }
        Err(e) => {
            warn!(request = request.id, error = %e, "could not split edge; snapping to its start");
            None
        }
    }
}
