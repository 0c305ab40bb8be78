//! Travel-cost model.
//!
//! ```text
//! travel_cost = length × multiplier(state) × (1 − discount_factor × p)
//! ```
//!
//! where `p ∈ [0, 1]` is the predicted probability that the edge is usable
//! (0 when no prediction is available).  Higher confidence makes an edge
//! cheaper; with the default factor a certain edge costs 20 % of its base.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use rd_core::NodeId;

use crate::graph::{EdgeState, RoadGraph};

/// `(u, v, key)` identifying an edge independent of its arena slot.
pub type EdgeKey = (NodeId, NodeId, u32);

/// Per-edge traversability predictions.
///
/// A prediction keyed under either orientation of an edge applies to it.
pub type EdgeProbabilities = HashMap<EdgeKey, f64>;

/// Failure of a [`TraversalModel`].  Callers fall back to no discount.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("traversal model is not loaded")]
    NotLoaded,

    #[error("traversal model inference failed: {0}")]
    Inference(String),
}

/// Something that scores edges by how likely they are to be passable.
pub trait TraversalModel: Send + Sync {
    fn predict(&self, graph: &RoadGraph) -> Result<EdgeProbabilities, ModelError>;
}

/// State multipliers and the prediction discount.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub clear:           f64,
    pub partial:         f64,
    /// Very large but finite: a blocked edge is a last resort, not a wall.
    pub blocked:         f64,
    pub discount_factor: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { clear: 1.0, partial: 5.0, blocked: 10_000.0, discount_factor: 0.8 }
    }
}

impl CostModel {
    pub fn multiplier(&self, state: EdgeState) -> f64 {
        match state {
            EdgeState::Clear => self.clear,
            EdgeState::Partial => self.partial,
            EdgeState::Blocked => self.blocked,
        }
    }

    /// Cost of an edge of `length` metres in `state` with usability `p`.
    /// `p` is clamped to `[0, 1]`; NaN counts as 0.
    pub fn travel_cost(&self, length: f64, state: EdgeState, p: f64) -> f64 {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        length * self.multiplier(state) * (1.0 - self.discount_factor * p)
    }

    /// Write `travel_cost` on every edge of `graph`.
    ///
    /// With `probabilities = None`, or for an edge with no prediction,
    /// `p = 0`.
    pub fn apply(&self, graph: &mut RoadGraph, probabilities: Option<&EdgeProbabilities>) {
        let mut predicted = 0usize;
        for edge in graph.edges_mut() {
            let p = probabilities
                .and_then(|probs| {
                    probs
                        .get(&(edge.u, edge.v, edge.key))
                        .or_else(|| probs.get(&(edge.v, edge.u, edge.key)))
                })
                .copied();
            if p.is_some() {
                predicted += 1;
            }
            edge.travel_cost = Some(self.travel_cost(edge.length, edge.state, p.unwrap_or(0.0)));
        }
        debug!(predicted, "travel costs assigned");
    }
}
