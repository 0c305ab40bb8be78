//! Spatial index over edge shapes.
//!
//! Each edge contributes one R-tree entry per polyline segment (a straight
//! segment between its endpoints when it has no stored geometry), tagged
//! with the edge's slot.  Distances are planar in `(lon, lat)` degree
//! space, which ranks nearby segments correctly at city scale.
//!
//! Direction is ignored: both edges of a two-way road are indexed and a
//! query may return either one.

use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use rd_core::{EdgeId, GeoPoint, Polyline};

use crate::graph::{Edge, RoadGraph};

type Segment = GeomWithData<Line<[f64; 2]>, EdgeId>;

/// R-tree of edge segments supporting nearest-edge lookup.
pub struct EdgeIndex {
    tree: RTree<Segment>,
}

impl EdgeIndex {
    /// Bulk-load every live edge of `graph`.
    pub fn build(graph: &RoadGraph) -> Self {
        let entries: Vec<Segment> = graph
            .edges()
            .flat_map(|(id, e)| segments(graph, id, e))
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slot of the edge passing closest to `p`, or `None` if empty.
    pub fn nearest_edge(&self, p: GeoPoint) -> Option<EdgeId> {
        self.tree.nearest_neighbor(&p.xy()).map(|seg| seg.data)
    }

    /// Index edge `id` as it currently is in `graph`.
    pub fn insert(&mut self, graph: &RoadGraph, id: EdgeId) {
        if let Some(edge) = graph.edge(id) {
            for seg in segments(graph, id, edge) {
                self.tree.insert(seg);
            }
        }
    }

    /// Drop the entries of `edge`, which lived in slot `id` of `graph`.
    ///
    /// Must be called with the edge's shape as it was indexed; the
    /// endpoints must still be present in `graph`.
    pub fn remove(&mut self, graph: &RoadGraph, id: EdgeId, edge: &Edge) {
        for seg in segments(graph, id, edge) {
            self.tree.remove(&seg);
        }
    }
}

fn segments(graph: &RoadGraph, id: EdgeId, edge: &Edge) -> Vec<Segment> {
    let shape = match &edge.geometry {
        Some(line) => line.clone(),
        None => match (graph.node_pos(edge.u), graph.node_pos(edge.v)) {
            (Some(a), Some(b)) => Polyline::straight(a, b),
            _ => return Vec::new(),
        },
    };
    shape
        .segments()
        .map(|(a, b)| GeomWithData::new(Line::new(a.xy(), b.xy()), id))
        .collect()
}
