//! Expanding node paths into road shapes.

use std::cmp::Ordering;

use tracing::debug;

use rd_core::{GeoPoint, NodeId};
use rd_graph::{Edge, RoadGraph};

/// Coordinates traced by `nodes` over `graph`.
///
/// For each consecutive pair the edge between them is chosen preferring one
/// with stored geometry, then the lowest travel cost; its geometry is turned
/// to start at the pair's first node.  Without geometry the two node
/// positions are used.  The point where two legs meet appears once.
pub fn route_coordinates(graph: &RoadGraph, nodes: &[NodeId]) -> Vec<GeoPoint> {
    let mut coords: Vec<GeoPoint> = Vec::new();
    for pair in nodes.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let Some(leg) = leg_coordinates(graph, u, v) else {
            debug!(u = u.0, v = v.0, "no edge between consecutive route nodes");
            continue;
        };
        let skip = usize::from(coords.last() == leg.first());
        coords.extend(leg.into_iter().skip(skip));
    }
    coords
}

fn leg_coordinates(graph: &RoadGraph, u: NodeId, v: NodeId) -> Option<Vec<GeoPoint>> {
    let edge = graph
        .edge_ids_between(u, v)
        .into_iter()
        .filter_map(|id| graph.edge(id))
        .min_by(|a, b| display_rank(a, b))?;

    let u_pos = graph.node_pos(u)?;
    match &edge.geometry {
        Some(line) => Some(line.clone().oriented_from(u_pos).points().to_vec()),
        None => Some(vec![u_pos, graph.node_pos(v)?]),
    }
}

/// Edges with geometry first, then cheaper edges.  An edge without a travel
/// cost ranks after any that has one.
fn display_rank(a: &Edge, b: &Edge) -> Ordering {
    let cost = |e: &Edge| e.travel_cost.unwrap_or(f64::INFINITY);
    a.geometry
        .is_none()
        .cmp(&b.geometry.is_none())
        .then_with(|| cost(a).total_cmp(&cost(b)))
}
