//! GeoJSON rendering for display clients.
//!
//! Coordinates are `[lon, lat]` as GeoJSON requires.

use serde_json::{Map, Value, json};

use rd_core::GeoPoint;
use rd_dispatch::SurvivorGroup;
use rd_graph::RoadGraph;

use crate::request::PlannedRoute;

/// Every live edge of `graph` as a `LineString` feature carrying `u`, `v`,
/// `key`, `length`, `state`, the travel cost when set, and the edge's tags.
pub fn graph_edges(graph: &RoadGraph) -> Value {
    let features: Vec<Value> = graph
        .edges()
        .filter_map(|(_, e)| {
            let coords: Vec<[f64; 2]> = match &e.geometry {
                Some(line) => line.points().iter().map(|p| p.xy()).collect(),
                None => vec![graph.node_pos(e.u)?.xy(), graph.node_pos(e.v)?.xy()],
            };

            let mut props = Map::new();
            for (k, v) in &e.tags {
                props.insert(k.clone(), Value::String(v.clone()));
            }
            props.insert("u".into(), json!(e.u));
            props.insert("v".into(), json!(e.v));
            props.insert("key".into(), json!(e.key));
            props.insert("length".into(), json!(e.length));
            props.insert("state".into(), json!(e.state));
            if let Some(cost) = e.travel_cost {
                props.insert("travel_cost".into(), json!(cost));
            }

            Some(feature(Value::Object(props), line_string(coords)))
        })
        .collect();
    collection(features)
}

/// One `LineString` feature per route, tagged with `vehicle_id`.
pub fn routes(routes: &[PlannedRoute]) -> Value {
    let features = routes
        .iter()
        .map(|r| {
            feature(
                json!({ "vehicle_id": r.vehicle, "type": "route", "cost": r.cost }),
                line_string(r.coordinates.iter().map(|p| p.xy()).collect()),
            )
        })
        .collect();
    collection(features)
}

/// Unreached survivor groups as `Point` features.
pub fn unassigned(graph: &RoadGraph, groups: &[SurvivorGroup]) -> Value {
    let features = groups
        .iter()
        .filter_map(|g| {
            let pos: GeoPoint = graph.node_pos(g.node)?;
            Some(feature(
                json!({ "node": g.node, "urgency": g.urgency, "count": g.count, "type": "unassigned" }),
                json!({ "type": "Point", "coordinates": pos.xy() }),
            ))
        })
        .collect();
    collection(features)
}

fn line_string(coords: Vec<[f64; 2]>) -> Value {
    json!({ "type": "LineString", "coordinates": coords })
}

fn feature(properties: Value, geometry: Value) -> Value {
    json!({ "type": "Feature", "properties": properties, "geometry": geometry })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}
