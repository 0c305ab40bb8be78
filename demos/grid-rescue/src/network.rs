//! Synthetic street grid standing in for a real road-network provider.
//!
//! A `SIZE × SIZE` lattice of two-way residential streets laid out near
//! downtown Mobile, Alabama.  Only nodes inside the requested bounding box
//! are returned, like a real provider would.

use rd_core::{BoundingBox, GeoPoint, NodeId, Polyline};
use rd_graph::{Edge, GraphSource, RoadGraph, SourceError};

pub const SIZE:    usize = 6;
pub const SPACING: f64   = 0.002; // degrees, ≈ 220 m

const ORIGIN: GeoPoint = GeoPoint { lat: 30.685, lon: -88.055 };

pub fn node_id(row: usize, col: usize) -> NodeId {
    NodeId(1_000 + (row * 100 + col) as i64)
}

pub fn node_pos(row: usize, col: usize) -> GeoPoint {
    GeoPoint::new(ORIGIN.lat + row as f64 * SPACING, ORIGIN.lon + col as f64 * SPACING)
}

/// The box covering the whole grid with a small margin.
pub fn grid_bbox() -> BoundingBox {
    let far = node_pos(SIZE - 1, SIZE - 1);
    let m = SPACING / 2.0;
    BoundingBox {
        north: far.lat + m,
        south: ORIGIN.lat - m,
        east:  far.lon + m,
        west:  ORIGIN.lon - m,
    }
}

pub struct GridSource;

impl GraphSource for GridSource {
    fn fetch(&self, bbox: &BoundingBox) -> Result<RoadGraph, SourceError> {
        let mut g = RoadGraph::directed();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let pos = node_pos(row, col);
                if bbox.contains(pos) {
                    g.add_node(node_id(row, col), pos);
                }
            }
        }

        for row in 0..SIZE {
            for col in 0..SIZE {
                if col + 1 < SIZE {
                    add_street(&mut g, (row, col), (row, col + 1), format!("Row {row} St"))?;
                }
                if row + 1 < SIZE {
                    add_street(&mut g, (row, col), (row + 1, col), format!("Col {col} Ave"))?;
                }
            }
        }

        if g.edge_count() == 0 {
            return Err(SourceError::NoData(*bbox));
        }
        Ok(g)
    }
}

/// Both directions of one street, skipped if either end lies outside the
/// graph's nodes.
fn add_street(
    g:    &mut RoadGraph,
    a:    (usize, usize),
    b:    (usize, usize),
    name: String,
) -> Result<(), SourceError> {
    let (u, v) = (node_id(a.0, a.1), node_id(b.0, b.1));
    if !(g.contains_node(u) && g.contains_node(v)) {
        return Ok(());
    }
    let line = Polyline::straight(node_pos(a.0, a.1), node_pos(b.0, b.1));
    let length = line.haversine_length();

    for (from, to, shape) in [(u, v, line.clone()), (v, u, line.reversed())] {
        let mut edge = Edge::new(from, to, 0, length);
        edge.geometry = Some(shape);
        edge.tags.insert("highway".into(), "residential".into());
        edge.tags.insert("name".into(), name.clone());
        g.add_edge(edge).map_err(|e| SourceError::Other(e.to_string()))?;
    }
    Ok(())
}
