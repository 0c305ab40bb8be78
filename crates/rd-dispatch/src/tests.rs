//! Unit tests for rd-dispatch.
//!
//! Graphs are built directly with `CostGraphBuilder` so costs are exact.

#[cfg(test)]
mod helpers {
    use rd_core::NodeId;
    use crate::{CostGraph, CostGraphBuilder};

    pub const P:  NodeId = NodeId(1);
    pub const S1: NodeId = NodeId(2);
    pub const S2: NodeId = NodeId(3);
    pub const D:  NodeId = NodeId(9);

    /// Star around pickup `P`: roads P–S1 and P–S2, each costing 100,
    /// plus an isolated node `D`.
    pub fn star() -> CostGraph {
        let mut b = CostGraphBuilder::new();
        b.add_road(P, S1, 100.0);
        b.add_road(P, S2, 100.0);
        b.add_node(D);
        b.build()
    }
}

// ── Cost graph ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use rd_core::{GeoPoint, NodeId};
    use rd_graph::{Edge, RoadGraph};
    use crate::{CostGraph, CostGraphBuilder};

    #[test]
    fn empty_build() {
        let g = CostGraphBuilder::new().build();
        assert!(g.is_empty());
        assert_eq!(g.arc_count(), 0);
    }

    fn road_graph() -> RoadGraph {
        let mut g = RoadGraph::directed();
        g.add_node(NodeId(1), GeoPoint::new(0.0, 0.0));
        g.add_node(NodeId(2), GeoPoint::new(0.0, 0.01));
        let mut e = Edge::new(NodeId(1), NodeId(2), 0, 1_000.0);
        e.travel_cost = Some(250.0);
        g.add_edge(e).unwrap();
        g
    }

    #[test]
    fn directed_graph_gives_one_arc_per_edge() {
        let c = CostGraph::from_road_graph(&road_graph());
        assert_eq!(c.node_count(), 2);
        assert_eq!(c.arc_count(), 1);
        let arcs: Vec<_> = c.out_arcs(c.slot(NodeId(1)).unwrap()).collect();
        assert_eq!(arcs, vec![(c.slot(NodeId(2)).unwrap(), 250.0)]);
    }

    #[test]
    fn undirected_graph_gives_both_directions() {
        let c = CostGraph::from_road_graph(&road_graph().to_undirected());
        assert_eq!(c.arc_count(), 2);
        assert!(c.contains(NodeId(2)));
    }

    #[test]
    fn unusable_weights_are_dropped() {
        let mut g = road_graph();
        let mut bad = Edge::new(NodeId(2), NodeId(1), 0, 1_000.0);
        bad.travel_cost = Some(f64::NAN);
        g.add_edge(bad).unwrap();
        let c = CostGraph::from_road_graph(&g);
        assert_eq!(c.arc_count(), 1);
    }
}

// ── Shortest paths ────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use rd_core::NodeId;
    use crate::{CostGraphBuilder, DispatchError, ShortestPathTree, shortest_path};
    use super::helpers::*;

    #[test]
    fn picks_cheaper_detour() {
        let (a, b, c, d) = (NodeId(1), NodeId(2), NodeId(3), NodeId(4));
        let mut g = CostGraphBuilder::new();
        g.add_road(a, b, 10.0);
        g.add_road(b, d, 10.0);
        g.add_road(a, c, 5.0);
        g.add_road(c, d, 50.0);
        let g = g.build();

        let path = shortest_path(&g, a, d).unwrap();
        assert_eq!(path.nodes, vec![a, b, d]);
        assert_eq!(path.cost, 20.0);
    }

    #[test]
    fn same_node_is_trivial() {
        let path = shortest_path(&star(), P, P).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn disconnected_is_no_path() {
        let err = shortest_path(&star(), P, D).unwrap_err();
        assert_eq!(err, DispatchError::NoPath { from: P, to: D });
        assert!(shortest_path(&star(), P, NodeId(404)).is_err());
    }

    #[test]
    fn arcs_are_directed() {
        let mut g = CostGraphBuilder::new();
        g.add_arc(NodeId(1), NodeId(2), 1.0);
        let g = g.build();
        assert!(shortest_path(&g, NodeId(1), NodeId(2)).is_ok());
        assert!(shortest_path(&g, NodeId(2), NodeId(1)).is_err());
    }

    #[test]
    fn tree_matches_point_queries() {
        let g = star();
        let tree = ShortestPathTree::build(&g, S1);
        assert_eq!(tree.cost_to(&g, S2), Some(200.0));
        assert_eq!(tree.path_to(&g, S2).unwrap().nodes, vec![S1, P, S2]);
        assert_eq!(tree.cost_to(&g, D), None);
        assert_eq!(tree.path_to(&g, S1).unwrap().nodes, vec![S1]);
        assert_eq!(shortest_path(&g, S1, S2).unwrap(), tree.path_to(&g, S2).unwrap());
    }
}

// ── Survivor aggregation ──────────────────────────────────────────────────────

#[cfg(test)]
mod survivor {
    use rd_core::{GeoPoint, NodeId};
    use rd_graph::{PointRequest, SnappedNode};
    use crate::{SurvivorGroup, aggregate_survivors, pickup_nodes};

    fn snap(node: i64, request: PointRequest) -> SnappedNode {
        SnappedNode { node: NodeId(node), request }
    }

    #[test]
    fn shared_nodes_merge_in_first_seen_order() {
        let o = GeoPoint::new(0.0, 0.0);
        let snapped = vec![
            snap(5, PointRequest::survivor(1, o, 2, 3)),
            snap(7, PointRequest::pickup(2, o)),
            snap(4, PointRequest::survivor(3, o, 1, 1)),
            snap(5, PointRequest::survivor(4, o, 4, 2)),
            snap(7, PointRequest::pickup(5, o)),
        ];
        assert_eq!(
            aggregate_survivors(&snapped),
            vec![SurvivorGroup::new(NodeId(5), 4, 5), SurvivorGroup::new(NodeId(4), 1, 1)]
        );
        assert_eq!(pickup_nodes(&snapped), vec![NodeId(7), NodeId(7)]);
    }

    #[test]
    fn priority_is_urgency_squared_plus_count() {
        assert_eq!(SurvivorGroup::new(NodeId(1), 5, 1).priority(), 26.0);
        assert_eq!(SurvivorGroup::new(NodeId(1), 1, 10).priority(), 11.0);
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use rd_core::NodeId;
    use crate::{CostGraphBuilder, DispatchError, SurvivorGroup, dispatch};
    use super::helpers::*;

    #[test]
    fn urgency_outranks_headcount() {
        // S1 scores 100/26, S2 scores 100/11: S1 goes first despite order.
        let groups = [SurvivorGroup::new(S2, 1, 10), SurvivorGroup::new(S1, 5, 1)];
        let out = dispatch(&star(), &[P], &groups).unwrap();

        assert!(out.unassigned.is_empty());
        assert_eq!(out.routes.len(), 1);
        let r = &out.routes[0];
        assert_eq!(r.vehicle, 0);
        assert_eq!(r.origin, P);
        assert_eq!(r.path, vec![P, S1, P, S2, P]);
        assert_eq!(r.service_cost, 300.0);
        assert_eq!(r.return_cost, 100.0);
        assert_eq!(r.total_cost(), 400.0);
    }

    #[test]
    fn disconnected_group_is_left_unassigned() {
        let groups = [SurvivorGroup::new(D, 5, 5), SurvivorGroup::new(S1, 1, 1)];
        let out = dispatch(&star(), &[P], &groups).unwrap();
        assert_eq!(out.unassigned, vec![SurvivorGroup::new(D, 5, 5)]);
        assert_eq!(out.routes[0].path, vec![P, S1, P]);
    }

    #[test]
    fn only_unreachable_groups_terminate_cleanly() {
        let groups = [SurvivorGroup::new(D, 1, 1)];
        let out = dispatch(&star(), &[P], &groups).unwrap();
        assert!(out.routes.is_empty());
        assert_eq!(out.unassigned.len(), 1);
    }

    #[test]
    fn group_on_a_pickup_is_not_scored_for_that_vehicle() {
        let groups = [SurvivorGroup::new(P, 3, 3)];
        let out = dispatch(&star(), &[P], &groups).unwrap();
        assert!(out.routes.is_empty());
        assert_eq!(out.unassigned, groups.to_vec());

        // A second vehicle elsewhere can still collect it.
        let out = dispatch(&star(), &[P, S1], &groups).unwrap();
        assert!(out.unassigned.is_empty());
        assert_eq!(out.routes.len(), 1);
        assert_eq!(out.routes[0].vehicle, 1);
        assert_eq!(out.routes[0].path, vec![S1, P]);
        assert_eq!(out.routes[0].return_cost, 0.0);
    }

    #[test]
    fn nearby_vehicles_split_the_work() {
        let (p1, p2, a, b) = (NodeId(1), NodeId(2), NodeId(10), NodeId(20));
        let mut g = CostGraphBuilder::new();
        g.add_road(p1, a, 10.0);
        g.add_road(p2, b, 10.0);
        g.add_road(p1, p2, 1_000.0);
        let g = g.build();

        let groups = [SurvivorGroup::new(a, 1, 1), SurvivorGroup::new(b, 1, 1)];
        let out = dispatch(&g, &[p1, p2], &groups).unwrap();
        assert_eq!(out.routes.len(), 2);
        assert_eq!(out.routes[0].path, vec![p1, a, p1]);
        assert_eq!(out.routes[1].path, vec![p2, b, p2]);
    }

    #[test]
    fn ties_go_to_the_first_pair() {
        let groups = [SurvivorGroup::new(S2, 2, 2), SurvivorGroup::new(S1, 2, 2)];
        let out = dispatch(&star(), &[P], &groups).unwrap();
        assert_eq!(out.routes[0].path, vec![P, S2, P, S1, P]);
    }

    #[test]
    fn invalid_inputs() {
        let groups = [SurvivorGroup::new(S1, 1, 1)];
        assert_eq!(dispatch(&star(), &[], &groups), Err(DispatchError::NoPickups));

        let zero = [SurvivorGroup::new(S1, 0, 0)];
        assert_eq!(dispatch(&star(), &[P], &zero), Err(DispatchError::ZeroWeight(S1)));

        let out = dispatch(&star(), &[], &[]).unwrap();
        assert!(out.routes.is_empty() && out.unassigned.is_empty());
    }
}
