//! Local OSM PBF extract as a [`GraphSource`] — enabled with the `osm`
//! Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use rd_graph::osm::PbfSource;
//!
//! let source = PbfSource::new("region.osm.pbf");
//! let graph = source.fetch(&bbox)?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`is_drivable`]), and
//! only the way segments whose two nodes both fall inside the requested
//! box.  One-way roads add a single edge; two-way roads add both
//! directions.  Nodes keep their OSM ids, which are always positive.
//!
//! The whole extract is scanned on every fetch; results are expected to be
//! cached by the caller.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use osmpbf::{Element, ElementReader};
use tracing::info;

use rd_core::{BoundingBox, GeoPoint, NodeId};

use crate::error::SourceError;
use crate::graph::{Edge, RoadGraph};
use crate::source::GraphSource;

/// Reads the road network from an OSM PBF file on disk.
#[derive(Clone, Debug)]
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSource for PbfSource {
    fn fetch(&self, bbox: &BoundingBox) -> Result<RoadGraph, SourceError> {
        // ── Pass 1: nodes inside the box + drivable ways ──────────────────
        let reader = ElementReader::from_path(&self.path).map_err(|e| SourceError::Osm(e.to_string()))?;

        let mut inside: HashMap<i64, GeoPoint> = HashMap::new();
        let mut road_ways: Vec<OsmWay> = Vec::new();

        reader
            .for_each(|elem| match elem {
                Element::Node(n) => {
                    let pos = GeoPoint::new(n.lat(), n.lon());
                    if bbox.contains(pos) {
                        inside.insert(n.id(), pos);
                    }
                }
                Element::DenseNode(n) => {
                    let pos = GeoPoint::new(n.lat(), n.lon());
                    if bbox.contains(pos) {
                        inside.insert(n.id(), pos);
                    }
                }
                Element::Way(w) => {
                    let tags: Vec<(&str, &str)> = w.tags().collect();
                    let highway = tags.iter().find(|(k, _)| *k == "highway").map(|(_, v)| *v);

                    if let Some(highway) = highway.filter(|h| is_drivable(h)) {
                        let kept: BTreeMap<String, String> = tags
                            .iter()
                            .filter(|(k, _)| KEPT_TAGS.contains(k))
                            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                            .collect();
                        road_ways.push(OsmWay {
                            refs: w.refs().collect(),
                            oneway: is_oneway(highway, &tags),
                            tags: kept,
                        });
                    }
                }
                _ => {}
            })
            .map_err(|e| SourceError::Osm(e.to_string()))?;

        // ── Pass 2: keep only road nodes ──────────────────────────────────
        let road_node_ids: HashSet<i64> = road_ways
            .iter()
            .flat_map(|w| w.refs.iter().copied())
            .filter(|id| inside.contains_key(id))
            .collect();

        let mut graph = RoadGraph::directed();
        for id in &road_node_ids {
            if let Some(&pos) = inside.get(id) {
                graph.add_node(NodeId(*id), pos);
            }
        }
        drop(inside);

        // ── Pass 3: edges from way node sequences ─────────────────────────
        for way in &road_ways {
            for window in way.refs.windows(2) {
                let (a, b) = (NodeId(window[0]), NodeId(window[1]));
                let (Some(pa), Some(pb)) = (graph.node_pos(a), graph.node_pos(b)) else {
                    continue;
                };
                let length = pa.distance_m(pb);

                add_segment(&mut graph, a, b, length, &way.tags)?;
                if !way.oneway {
                    add_segment(&mut graph, b, a, length, &way.tags)?;
                }
            }
        }

        if graph.edge_count() == 0 {
            return Err(SourceError::NoData(*bbox));
        }
        info!(
            path = %self.path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "road network read from PBF"
        );
        Ok(graph)
    }
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: bool,
    tags:   BTreeMap<String, String>,
}

const KEPT_TAGS: &[&str] = &["highway", "name", "maxspeed", "lanes", "oneway"];

fn add_segment(
    graph: &mut RoadGraph,
    u: NodeId,
    v: NodeId,
    length: f64,
    tags: &BTreeMap<String, String>,
) -> Result<(), SourceError> {
    let mut edge = Edge::new(u, v, graph.next_key(u, v), length);
    edge.tags = tags.clone();
    graph
        .add_edge(edge)
        .map(|_| ())
        .map_err(|e| SourceError::Other(e.to_string()))
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Whether a `highway` value is drivable by car.  Unknown classes are kept.
fn is_drivable(highway: &str) -> bool {
    !matches!(
        highway,
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track" | "bridleway"
            | "corridor" | "proposed" | "construction"
    )
}

/// Motorways and motorway links are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags
        .iter()
        .any(|(k, v)| *k == "oneway" && matches!(*v, "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}
