//! Inserting a node part-way along an edge.
//!
//! # Algorithm
//!
//! 1. Take the edge's geometry, or a straight segment `u → v` if it has none.
//! 2. Orient it to start at `u` (reverse if its last vertex is nearer `u`).
//! 3. Project the target point onto it to get a distance along the curve.
//! 4. Add a synthetic node at the interpolated position.
//! 5. Cut the curve there; both halves keep every interior vertex.
//! 6. Replace the edge with `u → new` and `new → v`, each carrying the
//!    original attributes, its half of the curve, and a length equal to the
//!    great-circle distance between its endpoints.

use tracing::debug;

use rd_core::{EdgeId, GeoPoint, NodeId, Polyline};

use crate::graph::{Edge, RoadGraph};
use crate::{GraphError, GraphResult};

/// Result of a split, with what changed so indexes can follow along.
pub(crate) struct Split {
    pub node:    NodeId,
    pub removed: (EdgeId, Edge),
    pub halves:  [EdgeId; 2],
}

/// Split edge `(u, v, key)` at the point on it nearest `point`.
///
/// Returns the new node's id, or `None` if the edge does not exist.
pub fn split_edge(
    graph: &mut RoadGraph,
    u: NodeId,
    v: NodeId,
    key: u32,
    point: GeoPoint,
) -> Option<NodeId> {
    match try_split_edge(graph, u, v, key, point) {
        Ok(node) => Some(node),
        Err(e) => {
            debug!(error = %e, "edge split skipped");
            None
        }
    }
}

/// [`split_edge`] with the failure reason.
///
/// # Errors
///
/// [`GraphError::EdgeNotFound`] if `(u, v, key)` is absent,
/// [`GraphError::NodeNotFound`] if an endpoint has no position.
pub fn try_split_edge(
    graph: &mut RoadGraph,
    u: NodeId,
    v: NodeId,
    key: u32,
    point: GeoPoint,
) -> GraphResult<NodeId> {
    split_in_place(graph, u, v, key, point).map(|s| s.node)
}

pub(crate) fn split_in_place(
    graph: &mut RoadGraph,
    u: NodeId,
    v: NodeId,
    key: u32,
    point: GeoPoint,
) -> GraphResult<Split> {
    let id = graph
        .find_edge(u, v, key)
        .ok_or(GraphError::EdgeNotFound { u, v, key })?;
    let u_pos = graph.node_pos(u).ok_or(GraphError::NodeNotFound(u))?;
    let v_pos = graph.node_pos(v).ok_or(GraphError::NodeNotFound(v))?;
    let original = graph
        .edge(id)
        .cloned()
        .ok_or(GraphError::EdgeNotFound { u, v, key })?;

    let line = original
        .geometry
        .clone()
        .unwrap_or_else(|| Polyline::straight(u_pos, v_pos))
        .oriented_from(u_pos);

    let along = line.project(point);
    let new_pos = line.interpolate(along);
    let node = graph.synthetic_node_id();
    graph.add_node(node, new_pos);

    let head = Edge {
        u,
        v: node,
        key: 0,
        length: u_pos.distance_m(new_pos),
        geometry: Some(line.substring(0.0, along)),
        ..original.clone()
    };
    let tail = Edge {
        u: node,
        v,
        key: 0,
        length: new_pos.distance_m(v_pos),
        geometry: Some(line.substring(along, line.planar_length())),
        ..original
    };

    let first = graph.add_edge(head)?;
    let second = graph.add_edge(tail)?;
    let removed = graph
        .remove_edge(id)
        .ok_or(GraphError::EdgeNotFound { u, v, key })?;

    debug!(u = u.0, v = v.0, key, node = node.0, "edge split");
    Ok(Split { node, removed: (id, removed), halves: [first, second] })
}
