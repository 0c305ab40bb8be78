//! Operator edits to road state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rd_core::NodeId;

use crate::graph::{EdgeState, RoadGraph};

/// Set the state of edge `(u, v, key)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeModification {
    pub u:   NodeId,
    pub v:   NodeId,
    #[serde(default)]
    pub key: u32,
    #[serde(rename = "state")]
    pub new_state: EdgeState,
}

impl EdgeModification {
    pub fn new(u: NodeId, v: NodeId, key: u32, new_state: EdgeState) -> Self {
        Self { u, v, key, new_state }
    }
}

/// Apply `modifications` in order, best effort.
///
/// Each sets edge `(u, v, key)` if present, then every parallel edge from
/// `v` back to `u`, whatever its key, so blockage holds in both directions.
/// Missing edges are skipped.  Returns how many edge states were written.
pub fn edit_edge_states(graph: &mut RoadGraph, modifications: &[EdgeModification]) -> usize {
    let mut written = 0;
    for m in modifications {
        match graph.find_edge(m.u, m.v, m.key) {
            Some(id) => {
                if let Some(edge) = graph.edge_mut(id) {
                    edge.state = m.new_state;
                    written += 1;
                }
            }
            None => debug!(u = m.u.0, v = m.v.0, key = m.key, "edge to edit not found; skipped"),
        }

        for id in graph.edge_ids_between(m.v, m.u) {
            if let Some(edge) = graph.edge_mut(id) {
                edge.state = m.new_state;
                written += 1;
            }
        }
    }
    written
}
