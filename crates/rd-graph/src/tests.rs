//! Unit tests for rd-graph.
//!
//! All tests use small hand-built graphs on the equator, where 0.001° of
//! longitude is about 111 m.

#[cfg(test)]
mod helpers {
    use rd_core::{GeoPoint, NodeId};
    use crate::{Edge, RoadGraph};

    pub const A: NodeId = NodeId(1);
    pub const B: NodeId = NodeId(2);
    pub const C: NodeId = NodeId(3);

    pub fn pos(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    /// A two-way road A ↔ B about 1.1 km long, stored as two directed
    /// edges without geometry, plus an isolated node C.
    pub fn two_way_road() -> RoadGraph {
        let mut g = RoadGraph::directed();
        g.add_node(A, pos(0.0, 0.0));
        g.add_node(B, pos(0.0, 0.01));
        g.add_node(C, pos(0.01, 0.0));
        let len = pos(0.0, 0.0).distance_m(pos(0.0, 0.01));
        g.add_edge(Edge::new(A, B, 0, len)).unwrap();
        g.add_edge(Edge::new(B, A, 0, len)).unwrap();
        g
    }
}

// ── Graph structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use rd_core::NodeId;
    use crate::{Edge, GraphError, RoadGraph};
    use super::helpers::*;

    #[test]
    fn empty_graph() {
        let g = RoadGraph::directed();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn edge_requires_endpoints() {
        let mut g = two_way_road();
        let err = g.add_edge(Edge::new(A, NodeId(99), 0, 1.0)).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(NodeId(99))));
    }

    #[test]
    fn parallel_edges_get_fresh_keys() {
        let mut g = two_way_road();
        let key = g.next_key(A, B);
        assert_eq!(key, 1);
        g.add_edge(Edge::new(A, B, key, 2_000.0)).unwrap();
        assert_eq!(g.edge_ids_between(A, B).len(), 2);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn same_key_replaces() {
        let mut g = two_way_road();
        g.add_edge(Edge::new(A, B, 0, 5.0)).unwrap();
        assert_eq!(g.edge_count(), 2);
        let id = g.find_edge(A, B, 0).unwrap();
        assert_eq!(g.edge(id).unwrap().length, 5.0);
    }

    #[test]
    fn removed_slots_stay_empty() {
        let mut g = two_way_road();
        let ab = g.find_edge(A, B, 0).unwrap();
        let ba = g.find_edge(B, A, 0).unwrap();
        assert!(g.remove_edge(ab).is_some());
        assert!(g.remove_edge(ab).is_none());
        assert_eq!(g.edge_count(), 1);
        assert!(g.edge(ba).is_some(), "other ids survive a removal");
        assert!(!g.has_edge_between(A, B));
    }

    #[test]
    fn undirected_collapses_two_way_pairs() {
        let g = two_way_road().to_undirected();
        assert!(!g.is_directed());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge_between(A, B));
        assert!(g.has_edge_between(B, A));
        assert_eq!(g.incident_edges(B).len(), 1);
    }

    #[test]
    fn synthetic_ids_avoid_existing_nodes() {
        let mut g = two_way_road();
        g.add_node(NodeId(-7), pos(0.5, 0.5));
        let id = g.synthetic_node_id();
        assert!(id.0 < -7);
        assert_ne!(g.synthetic_node_id(), id);
    }

    #[test]
    fn json_round_trip_is_structural() {
        let mut g = two_way_road();
        crate::split_edge(&mut g, A, B, 0, pos(0.0, 0.004)).unwrap();

        let json = serde_json::to_string(&g).unwrap();
        let mut back: RoadGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);

        let min = back.nodes().map(|n| n.id).min().unwrap();
        assert!(back.synthetic_node_id() < min);
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use crate::{Edge, EdgeIndex};
    use super::helpers::*;

    #[test]
    fn nearest_edge_picks_closest_road() {
        let mut g = two_way_road();
        let ac = g.add_edge(Edge::new(A, C, 0, 1_100.0)).unwrap();
        let idx = EdgeIndex::build(&g);
        assert_eq!(idx.len(), 3);

        let near_ac = idx.nearest_edge(pos(0.006, 0.0002)).unwrap();
        assert_eq!(near_ac, ac);

        let near_ab = idx.nearest_edge(pos(0.0002, 0.006)).unwrap();
        let e = g.edge(near_ab).unwrap();
        assert!([A, B].contains(&e.u) && [A, B].contains(&e.v));
    }

    #[test]
    fn empty_index() {
        let g = crate::RoadGraph::directed();
        let idx = EdgeIndex::build(&g);
        assert!(idx.is_empty());
        assert!(idx.nearest_edge(pos(0.0, 0.0)).is_none());
    }
}

// ── Editing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod edit {
    use crate::{EdgeModification, EdgeState, edit_edge_states};
    use super::helpers::*;

    #[test]
    fn edit_applies_both_directions() {
        let mut g = two_way_road();
        let written = edit_edge_states(&mut g, &[EdgeModification::new(A, B, 0, EdgeState::Blocked)]);
        assert_eq!(written, 2);
        for (_, e) in g.edges() {
            assert_eq!(e.state, EdgeState::Blocked);
        }
    }

    #[test]
    fn missing_edge_is_skipped() {
        let mut g = two_way_road();
        let written = edit_edge_states(&mut g, &[EdgeModification::new(A, C, 0, EdgeState::Partial)]);
        assert_eq!(written, 0);
        assert!(g.edges().all(|(_, e)| e.state == EdgeState::Clear));
    }

    #[test]
    fn later_modifications_win() {
        let mut g = two_way_road();
        edit_edge_states(
            &mut g,
            &[
                EdgeModification::new(A, B, 0, EdgeState::Blocked),
                EdgeModification::new(B, A, 0, EdgeState::Partial),
            ],
        );
        assert!(g.edges().all(|(_, e)| e.state == EdgeState::Partial));
    }

    #[test]
    fn modification_json_uses_state_field() {
        let m: EdgeModification =
            serde_json::from_str(r#"{"u": 1, "v": 2, "state": "partial"}"#).unwrap();
        assert_eq!(m, EdgeModification::new(A, B, 0, EdgeState::Partial));
    }
}

// ── Splitting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod split {
    use rd_core::Polyline;
    use crate::{Edge, EdgeState, GraphError, RoadGraph, split_edge, try_split_edge};
    use super::helpers::*;

    #[test]
    fn straight_split_conserves_length() {
        let mut g = two_way_road();
        let original = g.edge(g.find_edge(A, B, 0).unwrap()).unwrap().length;

        let n = split_edge(&mut g, A, B, 0, pos(0.0001, 0.004)).unwrap();
        assert!(n.is_synthetic());
        assert!(g.find_edge(A, B, 0).is_none());

        let head = g.edge(g.find_edge(A, n, 0).unwrap()).unwrap();
        let tail = g.edge(g.find_edge(n, B, 0).unwrap()).unwrap();
        assert!((head.length + tail.length - original).abs() < 1e-3);

        let p = g.node_pos(n).unwrap();
        assert!(p.lat.abs() < 1e-9, "split point lies on the road");
        assert!((p.lon - 0.004).abs() < 1e-9);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn halves_keep_attributes() {
        let mut g = two_way_road();
        let id = g.find_edge(A, B, 0).unwrap();
        {
            let e = g.edge_mut(id).unwrap();
            e.state = EdgeState::Partial;
            e.tags.insert("highway".into(), "residential".into());
        }
        let n = split_edge(&mut g, A, B, 0, pos(0.0, 0.005)).unwrap();
        for id in [g.find_edge(A, n, 0).unwrap(), g.find_edge(n, B, 0).unwrap()] {
            let e = g.edge(id).unwrap();
            assert_eq!(e.state, EdgeState::Partial);
            assert_eq!(e.tags.get("highway").map(String::as_str), Some("residential"));
        }
    }

    #[test]
    fn curved_split_follows_geometry() {
        let mut g = RoadGraph::directed();
        g.add_node(A, pos(0.0, 0.0));
        g.add_node(B, pos(0.0, 0.01));
        let line = Polyline::new(vec![pos(0.0, 0.0), pos(0.005, 0.005), pos(0.0, 0.01)]).unwrap();
        let mut e = Edge::new(A, B, 0, line.haversine_length());
        e.geometry = Some(line.clone());
        g.add_edge(e).unwrap();

        // Projects onto the bend.
        let n = split_edge(&mut g, A, B, 0, pos(0.006, 0.005)).unwrap();
        let p = g.node_pos(n).unwrap();
        assert!((p.lat - 0.005).abs() < 1e-6);
        assert!((p.lon - 0.005).abs() < 1e-6);

        let head = g.edge(g.find_edge(A, n, 0).unwrap()).unwrap();
        let tail = g.edge(g.find_edge(n, B, 0).unwrap()).unwrap();
        let total = head.length + tail.length;
        assert!((total - line.haversine_length()).abs() / total < 0.01);

        let head_geom = head.geometry.as_ref().unwrap();
        assert_eq!(head_geom.first(), pos(0.0, 0.0));
        assert!(head_geom.last().distance_m(p) < 0.01);
        let tail_geom = tail.geometry.as_ref().unwrap();
        assert!(tail_geom.first().distance_m(p) < 0.01);
        assert!(tail_geom.last().distance_m(pos(0.0, 0.01)) < 0.01);
    }

    #[test]
    fn reversed_geometry_is_reoriented() {
        let mut g = RoadGraph::directed();
        g.add_node(A, pos(0.0, 0.0));
        g.add_node(B, pos(0.0, 0.01));
        let mut e = Edge::new(A, B, 0, 1_112.0);
        e.geometry = Some(Polyline::straight(pos(0.0, 0.01), pos(0.0, 0.0)));
        g.add_edge(e).unwrap();

        let n = split_edge(&mut g, A, B, 0, pos(0.0, 0.002)).unwrap();
        let head = g.edge(g.find_edge(A, n, 0).unwrap()).unwrap();
        assert_eq!(head.geometry.as_ref().unwrap().first(), pos(0.0, 0.0));
        assert!(head.length < 300.0);
    }

    #[test]
    fn missing_edge_leaves_graph_alone() {
        let mut g = two_way_road();
        assert_eq!(split_edge(&mut g, A, C, 0, pos(0.005, 0.0)), None);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.node_count(), 3);

        let err = try_split_edge(&mut g, A, B, 7, pos(0.0, 0.005)).unwrap_err();
        assert!(matches!(err, GraphError::EdgeNotFound { key: 7, .. }));
    }

    #[test]
    fn undirected_split_by_either_orientation() {
        let mut g = two_way_road().to_undirected();
        let n = split_edge(&mut g, B, A, 0, pos(0.0, 0.003)).unwrap();
        assert!(g.has_edge_between(A, n));
        assert!(g.has_edge_between(n, B));
        assert_eq!(g.edge_count(), 2);
    }
}

// ── Requests & deduplication ──────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use rd_core::CoreError;
    use crate::{DedupPolicy, PointKind, PointRequest, deduplicate};
    use super::helpers::*;

    #[test]
    fn close_survivors_merge() {
        let points = vec![
            PointRequest::survivor(1, pos(0.0, 0.0), 3, 2),
            PointRequest::survivor(2, pos(0.000045, 0.0), 5, 4), // ~5 m
        ];
        let out = deduplicate(&points, &DedupPolicy::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
        assert_eq!(out[0].urgency, Some(5));
        assert_eq!(out[0].count, Some(6));
    }

    #[test]
    fn distant_survivors_stay_apart() {
        let points = vec![
            PointRequest::survivor(1, pos(0.0, 0.0), 3, 2),
            PointRequest::survivor(2, pos(0.00018, 0.0), 5, 4), // ~20 m
        ];
        assert_eq!(deduplicate(&points, &DedupPolicy::default()), points);
    }

    #[test]
    fn kinds_never_merge() {
        let points = vec![
            PointRequest::pickup(1, pos(0.0, 0.0)),
            PointRequest::survivor(2, pos(0.000045, 0.0), 5, 4),
            PointRequest::pickup(3, pos(0.0, 0.000045)),
        ];
        let out = deduplicate(&points, &DedupPolicy::default());
        let ids: Vec<i64> = out.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn survivor_needs_urgency_and_count() {
        let mut p = PointRequest::survivor(1, pos(0.0, 0.0), 3, 2);
        assert!(p.validate().is_ok());
        p.count = None;
        assert!(matches!(p.validate(), Err(CoreError::InvalidRequest(_))));
        assert!(PointRequest::pickup(2, pos(0.0, 0.0)).validate().is_ok());
    }

    #[test]
    fn survivor_without_priority_rejected() {
        let zero = PointRequest::survivor(1, pos(0.0, 0.0), 0, 0);
        assert!(matches!(zero.validate(), Err(CoreError::InvalidRequest(_))));
        assert!(PointRequest::survivor(2, pos(0.0, 0.0), 0, 3).validate().is_ok());
        assert!(PointRequest::survivor(3, pos(0.0, 0.0), 2, 0).validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let p = PointRequest::pickup(1, pos(95.0, 0.0));
        assert!(matches!(p.validate(), Err(CoreError::OutOfRange { field: "y", .. })));
    }

    #[test]
    fn request_json_shape() {
        let p: PointRequest =
            serde_json::from_str(r#"{"id": 4, "x": 1.5, "y": 2.5, "type": "pickup"}"#).unwrap();
        assert_eq!(p.kind, PointKind::Pickup);
        assert_eq!(p.pos(), pos(2.5, 1.5));
        assert_eq!(p.urgency, None);
    }
}

// ── Integration ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod integrate {
    use rd_core::NodeId;
    use crate::{
        Edge, EdgeModification, EdgeState, GraphError, PointRequest, RoadGraph, SnapPolicy,
        edit_edge_states, integrate_points,
    };
    use super::helpers::*;

    #[test]
    fn near_endpoint_snaps_without_split() {
        let mut g = two_way_road();
        let points = [PointRequest::survivor(1, pos(0.0002, 0.0001), 1, 1)]; // ~25 m from A
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        assert_eq!(snapped.len(), 1);
        assert_eq!(snapped[0].node, A);
        assert_eq!(snapped[0].request.id, 1);
        assert_eq!(g.edge_count(), 2);
    }

    /// Four two-way arms meeting at `X`, each about 555 m long.
    fn crossroads() -> (RoadGraph, NodeId) {
        let x = NodeId(10);
        let mut g = RoadGraph::directed();
        g.add_node(x, pos(0.0, 0.0));
        let arms = [(11, 0.005, 0.0), (12, -0.005, 0.0), (13, 0.0, 0.005), (14, 0.0, -0.005)];
        for (id, lat, lon) in arms {
            let end = NodeId(id);
            g.add_node(end, pos(lat, lon));
            let len = pos(0.0, 0.0).distance_m(pos(lat, lon));
            g.add_edge(Edge::new(x, end, 0, len)).unwrap();
            g.add_edge(Edge::new(end, x, 0, len)).unwrap();
        }
        (g, x)
    }

    #[test]
    fn point_near_intersection_snaps_to_it() {
        let (mut g, x) = crossroads();
        // ~25 m from X, ~11 m off the north arm.
        let points = [PointRequest::survivor(1, pos(0.0002, 0.0001), 2, 2)];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        assert_eq!(snapped[0].node, x);
        assert_eq!(g.edge_count(), 8);
        assert_eq!(g.node_count(), 5);
    }

    #[test]
    fn point_beyond_radius_splits_its_arm() {
        let (mut g, x) = crossroads();
        // ~100 m along the east arm.
        let points = [PointRequest::survivor(1, pos(0.00005, 0.0009), 2, 2)];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        let n = snapped[0].node;
        assert!(n.is_synthetic());
        let east = NodeId(13);
        let joined = |a, b| g.has_edge_between(a, b) || g.has_edge_between(b, a);
        assert!(joined(x, n) && joined(n, east));
        assert!(!joined(x, east));
        assert_eq!(g.edge_count(), 10);
    }

    #[test]
    fn mid_road_point_splits_both_directions() {
        let mut g = two_way_road();
        let points = [PointRequest::pickup(1, pos(0.0001, 0.005))];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();

        let n = snapped[0].node;
        assert!(n.is_synthetic());
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.node_count(), 5);
        assert!(!g.has_edge_between(A, B));
        assert!(!g.has_edge_between(B, A));
    }

    #[test]
    fn undirected_road_splits_once() {
        let mut g = two_way_road().to_undirected();
        let points = [PointRequest::pickup(1, pos(0.0001, 0.005))];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        let n = snapped[0].node;
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge_between(A, n) && g.has_edge_between(n, B));
    }

    #[test]
    fn blocked_road_snaps_to_nearer_end() {
        let mut g = two_way_road();
        edit_edge_states(&mut g, &[EdgeModification::new(A, B, 0, EdgeState::Blocked)]);
        let points = [PointRequest::survivor(1, pos(0.0, 0.006), 2, 2)];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        assert_eq!(snapped[0].node, B);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn later_points_see_earlier_splits() {
        let mut g = two_way_road().to_undirected();
        let points = [
            PointRequest::pickup(1, pos(0.0, 0.003)),
            PointRequest::survivor(2, pos(0.0, 0.007), 4, 1),
        ];
        let snapped = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap();
        let (p, s) = (snapped[0].node, snapped[1].node);
        assert_ne!(p, s);
        assert!(g.has_edge_between(p, s), "second split cuts the first split's tail");
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn empty_graph_is_an_error() {
        let mut g = RoadGraph::directed();
        let points = [PointRequest::pickup(1, pos(0.0, 0.0))];
        let err = integrate_points(&mut g, &points, &SnapPolicy::default()).unwrap_err();
        assert!(matches!(err, GraphError::NoEdges));
        assert!(integrate_points(&mut g, &[], &SnapPolicy::default()).unwrap().is_empty());
    }
}

// ── Cost model ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use crate::{CostModel, EdgeModification, EdgeProbabilities, EdgeState, edit_edge_states};
    use super::helpers::*;

    #[test]
    fn multipliers() {
        let m = CostModel::default();
        assert_eq!(m.travel_cost(10.0, EdgeState::Clear, 0.0), 10.0);
        assert_eq!(m.travel_cost(10.0, EdgeState::Partial, 0.0), 50.0);
        assert_eq!(m.travel_cost(10.0, EdgeState::Blocked, 0.0), 100_000.0);
    }

    #[test]
    fn probability_discounts_and_clamps() {
        let m = CostModel::default();
        assert!((m.travel_cost(10.0, EdgeState::Clear, 1.0) - 2.0).abs() < 1e-12);
        assert!((m.travel_cost(10.0, EdgeState::Clear, 0.5) - 6.0).abs() < 1e-12);
        assert_eq!(m.travel_cost(10.0, EdgeState::Clear, 7.0), m.travel_cost(10.0, EdgeState::Clear, 1.0));
        assert_eq!(m.travel_cost(10.0, EdgeState::Clear, -1.0), 10.0);
        assert_eq!(m.travel_cost(10.0, EdgeState::Clear, f64::NAN), 10.0);
    }

    #[test]
    fn apply_without_predictions_uses_length() {
        let mut g = two_way_road();
        edit_edge_states(&mut g, &[EdgeModification::new(A, B, 0, EdgeState::Partial)]);
        CostModel::default().apply(&mut g, None);
        for (_, e) in g.edges() {
            assert_eq!(e.travel_cost, Some(e.length * 5.0));
            assert_eq!(e.weight(), e.length * 5.0);
        }
    }

    #[test]
    fn predictions_match_either_orientation() {
        let mut g = two_way_road().to_undirected();
        let stored = g.edges().next().map(|(_, e)| (e.u, e.v)).unwrap();
        let mut probs = EdgeProbabilities::new();
        probs.insert((stored.1, stored.0, 0), 1.0);

        CostModel::default().apply(&mut g, Some(&probs));
        let (_, e) = g.edges().next().unwrap();
        assert!((e.travel_cost.unwrap() - e.length * 0.2).abs() < 1e-9);
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod source {
    use rd_core::BoundingBox;
    use crate::{GraphSource, RoadGraph, SourceError};
    use super::helpers::*;

    #[test]
    fn closures_are_sources() {
        let source = |_: &BoundingBox| -> Result<RoadGraph, SourceError> { Ok(two_way_road()) };
        let bbox = BoundingBox::new(0.02, -0.02, 0.02, -0.02).unwrap();
        assert_eq!(source.fetch(&bbox).unwrap().edge_count(), 2);
    }

    #[test]
    fn failing_source_reports_bbox() {
        let source = |b: &BoundingBox| -> Result<RoadGraph, SourceError> { Err(SourceError::NoData(*b)) };
        let bbox = BoundingBox::new(1.0, 0.0, 1.0, 0.0).unwrap();
        assert!(matches!(source.fetch(&bbox), Err(SourceError::NoData(b)) if b == bbox));
    }
}
