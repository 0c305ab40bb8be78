//! Road multigraph stored as an arena.
//!
//! # Data layout
//!
//! Nodes live in a dense `Vec<Node>`; a hash map resolves a road-network
//! `NodeId` to its slot.  Edges live in `Vec<Option<Edge>>` addressed by
//! [`EdgeId`]: removing an edge empties its slot and leaves every other
//! `EdgeId` valid, so callers can split edges while holding ids gathered
//! earlier.  Per-node adjacency lists hold outgoing and incoming `EdgeId`s
//! in insertion order and are maintained on every structural edit.
//!
//! # Directed vs. undirected
//!
//! The cached source graph is directed.  The routing copy is undirected
//! (see [`RoadGraph::to_undirected`]): there, every lookup treats `(u, v)`
//! and `(v, u)` as the same pair and an edge's stored orientation is only
//! the order its endpoints were written in.
//!
//! # Persistence
//!
//! Serialised as `{directed, nodes, edges}` with only live edges.  Slots
//! and adjacency are rebuilt on load, so `EdgeId`s are not stable across a
//! round trip.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};

use rd_core::{EdgeId, GeoPoint, NodeId, Polyline};

use crate::{GraphError, GraphResult};

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// A road-network node.  `x` is longitude, `y` latitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x:  f64,
    pub y:  f64,
}

impl Node {
    #[inline]
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::from_xy(self.x, self.y)
    }
}

/// Operator-reported condition of a road segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeState {
    #[default]
    Clear,
    Partial,
    Blocked,
}

impl EdgeState {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeState::Clear   => "clear",
            EdgeState::Partial => "partial",
            EdgeState::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for EdgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One road segment between `u` and `v`.  `key` distinguishes parallel
/// edges over the same endpoint pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u:   NodeId,
    pub v:   NodeId,
    #[serde(default)]
    pub key: u32,

    /// Physical length in metres.
    pub length: f64,

    /// Road shape; absent means a straight segment between the endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polyline>,

    #[serde(default)]
    pub state: EdgeState,

    /// Routing weight, set by `CostModel::apply` before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_cost: Option<f64>,

    /// Remaining source attributes (road class, name, …), carried through
    /// splits untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl Edge {
    /// A clear edge without geometry or tags.
    pub fn new(u: NodeId, v: NodeId, key: u32, length: f64) -> Self {
        Self {
            u,
            v,
            key,
            length,
            geometry: None,
            state: EdgeState::Clear,
            travel_cost: None,
            tags: BTreeMap::new(),
        }
    }

    /// Weight used by shortest-path search: `travel_cost`, else `length`.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.travel_cost.unwrap_or(self.length)
    }

    /// The endpoint opposite `n`, if `n` is an endpoint at all.
    #[inline]
    pub fn other_end(&self, n: NodeId) -> Option<NodeId> {
        if self.u == n {
            Some(self.v)
        } else if self.v == n {
            Some(self.u)
        } else {
            None
        }
    }

    fn connects(&self, u: NodeId, v: NodeId, directed: bool) -> bool {
        (self.u == u && self.v == v) || (!directed && self.u == v && self.v == u)
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Road multigraph with parallel edges and stable edge slots.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct RoadGraph {
    directed:       bool,
    nodes:          Vec<Node>,
    node_slot:      FxHashMap<NodeId, usize>,
    edges:          Vec<Option<Edge>>,
    out_adj:        Vec<Vec<EdgeId>>,
    in_adj:         Vec<Vec<EdgeId>>,
    live_edges:     usize,
    next_synthetic: i64,
}

impl RoadGraph {
    /// Empty directed graph — the shape road-network sources produce.
    pub fn directed() -> Self {
        Self::with_direction(true)
    }

    /// Empty undirected graph.
    pub fn undirected() -> Self {
        Self::with_direction(false)
    }

    fn with_direction(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            node_slot: FxHashMap::default(),
            edges: Vec::new(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
            live_edges: 0,
            next_synthetic: -1,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Insert a node, or move an existing one to `pos`.
    pub fn add_node(&mut self, id: NodeId, pos: GeoPoint) {
        if let Some(&slot) = self.node_slot.get(&id) {
            self.nodes[slot].x = pos.x();
            self.nodes[slot].y = pos.y();
            return;
        }
        self.node_slot.insert(id, self.nodes.len());
        self.nodes.push(Node { id, x: pos.x(), y: pos.y() });
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        if id.0 <= self.next_synthetic {
            self.next_synthetic = id.0.saturating_sub(1);
        }
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_slot.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_slot.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.node(id).map(Node::pos)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Reserve a fresh id for a node created by splitting an edge.
    ///
    /// Ids count down from below the smallest id ever inserted, so they
    /// never collide with source nodes or with each other.
    pub fn synthetic_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_synthetic);
        self.next_synthetic = self.next_synthetic.saturating_sub(1);
        id
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// Insert `edge`, replacing any existing edge with the same endpoints
    /// and key (either orientation in an undirected graph).
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<EdgeId> {
        for n in [edge.u, edge.v] {
            if !self.contains_node(n) {
                return Err(GraphError::NodeNotFound(n));
            }
        }

        if let Some(id) = self.find_edge(edge.u, edge.v, edge.key) {
            self.detach(id);
            self.edges[id.index()] = Some(edge);
            self.attach(id);
            return Ok(id);
        }

        let id = EdgeId::try_from(self.edges.len()).map_err(|_| GraphError::ArenaFull)?;
        self.edges.push(Some(edge));
        self.attach(id);
        self.live_edges += 1;
        Ok(id)
    }

    /// Remove the edge in slot `id`, returning it.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        if self.edge(id).is_none() {
            return None;
        }
        self.detach(id);
        self.live_edges -= 1;
        self.edges.get_mut(id.index()).and_then(Option::take)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// All live edges with their slots, in slot order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId(i as u32), e)))
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> + '_ {
        self.edges.iter_mut().flatten()
    }

    /// Slot of edge `(u, v, key)`.
    pub fn find_edge(&self, u: NodeId, v: NodeId, key: u32) -> Option<EdgeId> {
        self.edge_ids_between(u, v)
            .into_iter()
            .find(|&id| self.edge(id).is_some_and(|e| e.key == key))
    }

    /// Slots of every parallel edge from `u` to `v`, in insertion order.
    /// Undirected graphs include edges stored as `(v, u)`.
    pub fn edge_ids_between(&self, u: NodeId, v: NodeId) -> Vec<EdgeId> {
        let Some(&slot) = self.node_slot.get(&u) else {
            return Vec::new();
        };
        let directed = self.directed;
        let incoming: &[EdgeId] = if directed { &[] } else { &self.in_adj[slot] };

        let mut found: Vec<EdgeId> = Vec::new();
        for &id in self.out_adj[slot].iter().chain(incoming) {
            if found.contains(&id) {
                continue;
            }
            if self.edge(id).is_some_and(|e| e.connects(u, v, directed)) {
                found.push(id);
            }
        }
        found
    }

    /// `true` if any edge runs from `u` to `v` (either way if undirected).
    pub fn has_edge_between(&self, u: NodeId, v: NodeId) -> bool {
        !self.edge_ids_between(u, v).is_empty()
    }

    /// Smallest key not yet used between `u` and `v`.
    pub fn next_key(&self, u: NodeId, v: NodeId) -> u32 {
        let used: Vec<u32> = self
            .edge_ids_between(u, v)
            .into_iter()
            .filter_map(|id| self.edge(id).map(|e| e.key))
            .collect();
        (0..).find(|k| !used.contains(k)).unwrap_or(0)
    }

    /// Edges leaving `n` (every incident edge if undirected).
    pub fn incident_edges(&self, n: NodeId) -> Vec<EdgeId> {
        let Some(&slot) = self.node_slot.get(&n) else {
            return Vec::new();
        };
        let mut ids = self.out_adj[slot].clone();
        if !self.directed {
            for &id in &self.in_adj[slot] {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    // ── Copies ────────────────────────────────────────────────────────────

    /// Undirected copy.  Edges sharing an unordered endpoint pair and key
    /// collapse into one; the later edge's attributes win.
    pub fn to_undirected(&self) -> RoadGraph {
        let mut out = RoadGraph::undirected();
        for n in &self.nodes {
            out.add_node(n.id, n.pos());
        }
        out.next_synthetic = out.next_synthetic.min(self.next_synthetic);
        for (_, e) in self.edges() {
            // Endpoints were copied above, so insertion cannot fail.
            let _ = out.add_edge(e.clone());
        }
        out
    }

    // ── Adjacency maintenance ─────────────────────────────────────────────

    fn attach(&mut self, id: EdgeId) {
        let Some((u, v)) = self.edge(id).map(|e| (e.u, e.v)) else {
            return;
        };
        let (su, sv) = (self.node_slot[&u], self.node_slot[&v]);
        self.out_adj[su].push(id);
        self.in_adj[sv].push(id);
    }

    fn detach(&mut self, id: EdgeId) {
        let Some((u, v)) = self.edge(id).map(|e| (e.u, e.v)) else {
            return;
        };
        let (su, sv) = (self.node_slot[&u], self.node_slot[&v]);
        self.out_adj[su].retain(|&e| e != id);
        self.in_adj[sv].retain(|&e| e != id);
    }

    /// Live edges sorted by `(u, v, key)` for order-insensitive comparison.
    fn sorted_edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges().map(|(_, e)| e).collect();
        edges.sort_by_key(|e| (e.u, e.v, e.key));
        edges
    }
}

/// Structural equality: same direction, nodes, and live edges, regardless
/// of slot layout or insertion order.
impl PartialEq for RoadGraph {
    fn eq(&self, other: &Self) -> bool {
        if self.directed != other.directed
            || self.node_count() != other.node_count()
            || self.edge_count() != other.edge_count()
        {
            return false;
        }
        self.nodes.iter().all(|n| other.node(n.id) == Some(n))
            && self.sorted_edges() == other.sorted_edges()
    }
}

// ── Persistence form ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GraphRecordRef<'a> {
    directed: bool,
    nodes:    &'a [Node],
    edges:    Vec<&'a Edge>,
}

#[derive(Deserialize)]
struct GraphRecord {
    directed: bool,
    nodes:    Vec<Node>,
    edges:    Vec<Edge>,
}

impl Serialize for RoadGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphRecordRef {
            directed: self.directed,
            nodes:    &self.nodes,
            edges:    self.edges().map(|(_, e)| e).collect(),
        }
        .serialize(serializer)
    }
}

impl TryFrom<GraphRecord> for RoadGraph {
    type Error = GraphError;

    fn try_from(record: GraphRecord) -> GraphResult<Self> {
        let mut graph = RoadGraph::with_direction(record.directed);
        for n in &record.nodes {
            graph.add_node(n.id, n.pos());
        }
        for e in record.edges {
            graph.add_edge(e)?;
        }
        Ok(graph)
    }
}
