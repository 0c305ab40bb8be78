//! Greedy multi-vehicle assignment.
//!
//! # Round structure
//!
//! Each vehicle keeps a [`ShortestPathTree`] rooted at its current node.
//! A round reads every (vehicle, group) cost off those trees, commits the
//! best pair, and rebuilds only the winner's tree, since no other vehicle
//! moved.  Results are identical to running a fresh search per pair.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rd_core::NodeId;

use crate::network::CostGraph;
use crate::router::ShortestPathTree;
use crate::survivor::SurvivorGroup;
use crate::{DispatchError, DispatchResult};

/// The route of one vehicle that moved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    /// Index of the vehicle's pickup in the input pickup list.
    pub vehicle: usize,
    pub origin:  NodeId,
    /// Visited nodes from `origin` through every assigned group and back to
    /// the nearest reachable pickup.  Consecutive legs share no node.
    pub path: Vec<NodeId>,
    /// Cost driven up to the last assigned group.
    pub service_cost: f64,
    /// Cost of the final leg back to a pickup (0 if none was reachable).
    pub return_cost: f64,
}

impl VehicleRoute {
    pub fn total_cost(&self) -> f64 {
        self.service_cost + self.return_cost
    }
}

/// Routes for the vehicles that moved, in pickup order, plus the groups no
/// vehicle could reach.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub routes:     Vec<VehicleRoute>,
    pub unassigned: Vec<SurvivorGroup>,
}

struct Vehicle {
    origin:  NodeId,
    current: NodeId,
    path:    Vec<NodeId>,
    odometer: f64,
}

/// Assign every reachable survivor group to a vehicle starting at one of
/// `pickups`, then send each vehicle that moved back to its nearest pickup.
///
/// Groups sitting on a vehicle's current node are not scored for that
/// vehicle.  Unreachable groups end up in [`DispatchOutcome::unassigned`].
///
/// # Errors
///
/// - [`DispatchError::NoPickups`] if `survivors` is non-empty and
///   `pickups` is empty.
/// - [`DispatchError::ZeroWeight`] if a group has urgency and count both 0.
pub fn dispatch(
    graph: &CostGraph,
    pickups: &[NodeId],
    survivors: &[SurvivorGroup],
) -> DispatchResult<DispatchOutcome> {
    if survivors.is_empty() {
        return Ok(DispatchOutcome::default());
    }
    if pickups.is_empty() {
        return Err(DispatchError::NoPickups);
    }
    if let Some(g) = survivors.iter().find(|g| g.priority() == 0.0) {
        return Err(DispatchError::ZeroWeight(g.node));
    }

    let mut vehicles: Vec<Vehicle> = pickups
        .iter()
        .map(|&p| Vehicle { origin: p, current: p, path: vec![p], odometer: 0.0 })
        .collect();
    let mut trees = build_trees(graph, vehicles.iter().map(|v| v.current));
    let mut remaining: Vec<SurvivorGroup> = survivors.to_vec();

    // ── Assignment rounds ─────────────────────────────────────────────────
    while !remaining.is_empty() {
        let mut best: Option<(f64, usize, usize, f64)> = None;

        for (vi, (vehicle, tree)) in vehicles.iter().zip(&trees).enumerate() {
            for (si, group) in remaining.iter().enumerate() {
                if group.node == vehicle.current {
                    continue;
                }
                let Some(leg) = tree.cost_to(graph, group.node) else {
                    continue;
                };
                let score = (vehicle.odometer + leg) / group.priority();
                if best.is_none_or(|(b, ..)| score < b) {
                    best = Some((score, vi, si, leg));
                }
            }
        }

        let Some((score, vi, si, leg)) = best else {
            break;
        };

        let group = remaining.remove(si);
        let vehicle = &mut vehicles[vi];
        if let Some(path) = trees[vi].path_to(graph, group.node) {
            vehicle.path.extend(path.nodes.into_iter().skip(1));
        }
        vehicle.current = group.node;
        vehicle.odometer += leg;
        trees[vi] = ShortestPathTree::build(graph, vehicle.current);

        debug!(
            vehicle = vi,
            node = group.node.0,
            urgency = group.urgency,
            count = group.count,
            score,
            "survivor group assigned"
        );
    }

    // ── Return legs ───────────────────────────────────────────────────────
    let mut routes = Vec::new();
    for (vi, (vehicle, tree)) in vehicles.into_iter().zip(&trees).enumerate() {
        if vehicle.path.len() <= 1 {
            continue;
        }
        let mut path = vehicle.path;
        let mut return_cost = 0.0;

        let nearest = pickups
            .iter()
            .filter_map(|&p| tree.cost_to(graph, p).map(|c| (c, p)))
            .fold(None::<(f64, NodeId)>, |best, (c, p)| match best {
                Some((b, _)) if b <= c => best,
                _ => Some((c, p)),
            });
        if let Some((cost, pickup)) = nearest {
            if let Some(back) = tree.path_to(graph, pickup) {
                path.extend(back.nodes.into_iter().skip(1));
                return_cost = cost;
            }
        }

        routes.push(VehicleRoute {
            vehicle: vi,
            origin: vehicle.origin,
            path,
            service_cost: vehicle.odometer,
            return_cost,
        });
    }

    info!(
        vehicles = pickups.len(),
        routes = routes.len(),
        assigned = survivors.len() - remaining.len(),
        unassigned = remaining.len(),
        "dispatch complete"
    );
    Ok(DispatchOutcome { routes, unassigned: remaining })
}

/// One tree per start node, in order.
fn build_trees(graph: &CostGraph, starts: impl Iterator<Item = NodeId>) -> Vec<ShortestPathTree> {
    let starts: Vec<NodeId> = starts.collect();

    #[cfg(not(feature = "parallel"))]
    {
        starts.iter().map(|&s| ShortestPathTree::build(graph, s)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        starts.par_iter().map(|&s| ShortestPathTree::build(graph, s)).collect()
    }
}
