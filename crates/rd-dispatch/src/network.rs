//! Routing view of a road graph.
//!
//! # Data layout
//!
//! Nodes are renumbered densely (`u32` slots, in the road graph's node
//! order) and arcs are stored in **Compressed Sparse Row** format.  The
//! outgoing arcs of slot `n` occupy
//!
//! ```text
//! arc_to[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! with their costs in the parallel `arc_cost` array.  An undirected road
//! graph contributes one arc in each direction per edge.  Parallel edges
//! stay separate arcs; Dijkstra simply relaxes the cheaper one first.

use rustc_hash::FxHashMap;
use tracing::debug;

use rd_core::NodeId;
use rd_graph::RoadGraph;

/// Immutable weighted digraph in CSR form.  Build with [`CostGraphBuilder`]
/// or [`CostGraph::from_road_graph`].
#[derive(Clone, Debug)]
pub struct CostGraph {
    /// Road-network id of each slot.
    node_ids:  Vec<NodeId>,
    node_slot: FxHashMap<NodeId, u32>,

    /// CSR row pointer; length `node_count + 1`.
    out_start: Vec<u32>,
    arc_to:    Vec<u32>,
    arc_cost:  Vec<f64>,
}

impl CostGraph {
    /// Arcs weighted by [`rd_graph::Edge::weight`] (`travel_cost`, falling
    /// back to `length`).  Arcs with a negative or non-finite weight are
    /// left out.
    pub fn from_road_graph(graph: &RoadGraph) -> Self {
        let mut b = CostGraphBuilder::with_capacity(graph.node_count(), graph.edge_count() * 2);
        for n in graph.nodes() {
            b.add_node(n.id);
        }

        let mut skipped = 0usize;
        for (_, e) in graph.edges() {
            let w = e.weight();
            if !(w.is_finite() && w >= 0.0) {
                skipped += 1;
                continue;
            }
            b.add_arc(e.u, e.v, w);
            if !graph.is_directed() {
                b.add_arc(e.v, e.u, w);
            }
        }
        if skipped > 0 {
            debug!(skipped, "edges with unusable weights left out of routing");
        }
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_slot.contains_key(&id)
    }

    // ── Slot mapping ──────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn slot(&self, id: NodeId) -> Option<u32> {
        self.node_slot.get(&id).copied()
    }

    #[inline]
    pub(crate) fn node_id(&self, slot: u32) -> NodeId {
        self.node_ids[slot as usize]
    }

    /// `(target slot, cost)` of every arc leaving `slot`.
    #[inline]
    pub(crate) fn out_arcs(&self, slot: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.out_start[slot as usize] as usize;
        let end   = self.out_start[slot as usize + 1] as usize;
        (start..end).map(move |i| (self.arc_to[i], self.arc_cost[i]))
    }
}

// ── CostGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`CostGraph`] incrementally, then call [`build`](Self::build).
///
/// Arcs may reference nodes not yet added; they are added on first sight.
#[derive(Default)]
pub struct CostGraphBuilder {
    node_ids:  Vec<NodeId>,
    node_slot: FxHashMap<NodeId, u32>,
    raw_arcs:  Vec<RawArc>,
}

struct RawArc {
    from: u32,
    to:   u32,
    cost: f64,
}

impl CostGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        Self {
            node_ids:  Vec::with_capacity(nodes),
            node_slot: FxHashMap::default(),
            raw_arcs:  Vec::with_capacity(arcs),
        }
    }

    /// Register `id` and return its slot (existing slot if already added).
    pub fn add_node(&mut self, id: NodeId) -> u32 {
        if let Some(&slot) = self.node_slot.get(&id) {
            return slot;
        }
        let slot = self.node_ids.len() as u32;
        self.node_ids.push(id);
        self.node_slot.insert(id, slot);
        slot
    }

    /// Add a directed arc.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, cost: f64) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.raw_arcs.push(RawArc { from, to, cost });
    }

    /// Add arcs in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, cost: f64) {
        self.add_arc(a, b, cost);
        self.add_arc(b, a, cost);
    }

    /// Consume the builder.  Arcs keep their insertion order within each
    /// source node.
    pub fn build(self) -> CostGraph {
        let node_count = self.node_ids.len();

        let mut raw = self.raw_arcs;
        raw.sort_by_key(|a| a.from);

        let arc_to:   Vec<u32> = raw.iter().map(|a| a.to).collect();
        let arc_cost: Vec<f64> = raw.iter().map(|a| a.cost).collect();

        let mut out_start = vec![0u32; node_count + 1];
        for a in &raw {
            out_start[a.from as usize + 1] += 1;
        }
        for i in 1..=node_count {
            out_start[i] += out_start[i - 1];
        }

        CostGraph {
            node_ids: self.node_ids,
            node_slot: self.node_slot,
            out_start,
            arc_to,
            arc_cost,
        }
    }
}
