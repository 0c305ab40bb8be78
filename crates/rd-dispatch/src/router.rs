//! Dijkstra over a [`CostGraph`].
//!
//! Costs are `f64` in whatever unit the road graph's weights carry
//! (metres scaled by the cost model).  The heap orders on
//! [`f64::total_cmp`] with the node slot as secondary key, so tie-breaking
//! is deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use rd_core::NodeId;

use crate::network::CostGraph;
use crate::{DispatchError, DispatchResult};

const NO_PREV: u32 = u32::MAX;

// ── Path ──────────────────────────────────────────────────────────────────────

/// A shortest path: nodes from source to target inclusive, and its cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost:  f64,
}

impl Path {
    /// `true` if the path does not leave its source.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Shortest path from `from` to `to`.
///
/// `from == to` yields the single-node path with cost 0, even for a node
/// the graph does not contain.
///
/// # Errors
///
/// [`DispatchError::NoPath`] if `to` is unreachable or either node is
/// unknown.
pub fn shortest_path(graph: &CostGraph, from: NodeId, to: NodeId) -> DispatchResult<Path> {
    if from == to {
        return Ok(Path { nodes: vec![from], cost: 0.0 });
    }
    let no_path = || DispatchError::NoPath { from, to };
    let target = graph.slot(to).ok_or_else(no_path)?;
    let tree = ShortestPathTree::search(graph, from, Some(target));
    tree.path_to(graph, to).ok_or_else(no_path)
}

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Costs and predecessors from one source to every reachable node.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    source: NodeId,
    dist:   Vec<f64>,
    prev:   Vec<u32>,
}

impl ShortestPathTree {
    /// One-to-all search from `source`.  An unknown source reaches nothing
    /// but itself.
    pub fn build(graph: &CostGraph, source: NodeId) -> Self {
        Self::search(graph, source, None)
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Cost of the cheapest path to `to`, or `None` if unreachable.
    pub fn cost_to(&self, graph: &CostGraph, to: NodeId) -> Option<f64> {
        if to == self.source {
            return Some(0.0);
        }
        let slot = graph.slot(to)? as usize;
        self.dist.get(slot).copied().filter(|d| d.is_finite())
    }

    /// Cheapest path to `to`, or `None` if unreachable.
    pub fn path_to(&self, graph: &CostGraph, to: NodeId) -> Option<Path> {
        let cost = self.cost_to(graph, to)?;
        if to == self.source {
            return Some(Path { nodes: vec![to], cost });
        }

        let mut nodes = Vec::new();
        let mut cur = graph.slot(to)?;
        loop {
            nodes.push(graph.node_id(cur));
            let p = self.prev[cur as usize];
            if p == NO_PREV {
                break;
            }
            cur = p;
        }
        nodes.reverse();
        Some(Path { nodes, cost })
    }

    /// Dijkstra from `source`, stopping once `target` is settled if given.
    fn search(graph: &CostGraph, source: NodeId, target: Option<u32>) -> Self {
        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![NO_PREV; n];

        let Some(start) = graph.slot(source) else {
            return Self { source, dist, prev };
        };
        dist[start as usize] = 0.0;

        // Reverse turns the max-heap into a min-heap.
        let mut heap: BinaryHeap<Reverse<(Cost, u32)>> = BinaryHeap::new();
        heap.push(Reverse((Cost(0.0), start)));

        while let Some(Reverse((Cost(cost), node))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[node as usize] {
                continue;
            }
            if Some(node) == target {
                break;
            }

            for (next, w) in graph.out_arcs(node) {
                let new_cost = cost + w;
                if new_cost < dist[next as usize] {
                    dist[next as usize] = new_cost;
                    prev[next as usize] = node;
                    heap.push(Reverse((Cost(new_cost), next)));
                }
            }
        }

        Self { source, dist, prev }
    }
}

// ── Cost ordering ─────────────────────────────────────────────────────────────

/// Totally ordered `f64` for the heap.  Arc costs are never NaN.
#[derive(Copy, Clone, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
