//! Dispatch inputs derived from snapped point requests.

use serde::{Deserialize, Serialize};

use rd_core::NodeId;
use rd_graph::{PointKind, SnappedNode};

/// Survivors waiting at one graph node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorGroup {
    pub node:    NodeId,
    pub urgency: u32,
    pub count:   u32,
}

impl SurvivorGroup {
    pub fn new(node: NodeId, urgency: u32, count: u32) -> Self {
        Self { node, urgency, count }
    }

    /// Score denominator `urgency² + count`.  Larger means more pressing.
    #[inline]
    pub fn priority(&self) -> f64 {
        let u = f64::from(self.urgency);
        u * u + f64::from(self.count)
    }
}

/// Merge survivor snaps that landed on the same node, in first-seen order:
/// the group takes the highest urgency and the total count.  Pickup snaps
/// are ignored.
pub fn aggregate_survivors(snapped: &[SnappedNode]) -> Vec<SurvivorGroup> {
    let mut groups: Vec<SurvivorGroup> = Vec::new();
    for s in snapped.iter().filter(|s| s.request.kind == PointKind::Survivor) {
        let urgency = s.request.urgency.unwrap_or(0);
        let count = s.request.count.unwrap_or(0);
        match groups.iter_mut().find(|g| g.node == s.node) {
            Some(g) => {
                g.urgency = g.urgency.max(urgency);
                g.count = g.count.saturating_add(count);
            }
            None => groups.push(SurvivorGroup::new(s.node, urgency, count)),
        }
    }
    groups
}

/// Nodes of the pickup snaps, in input order.  One vehicle starts at each,
/// so a node listed twice fields two vehicles.
pub fn pickup_nodes(snapped: &[SnappedNode]) -> Vec<NodeId> {
    snapped
        .iter()
        .filter(|s| s.request.kind == PointKind::Pickup)
        .map(|s| s.node)
        .collect()
}
