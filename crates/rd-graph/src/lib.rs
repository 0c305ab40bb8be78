//! `rd-graph` — the road multigraph and everything that mutates it.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`graph`]     | `RoadGraph` arena, `Node`, `Edge`, `EdgeState`            |
//! | [`index`]     | `EdgeIndex` — R-tree over edge segments                   |
//! | [`edit`]      | `EdgeModification`, `edit_edge_states`                    |
//! | [`split`]     | `split_edge`, `try_split_edge`                            |
//! | [`request`]   | `PointRequest`, `SnappedNode`, `deduplicate`              |
//! | [`integrate`] | `SnapPolicy`, `integrate_points`                          |
//! | [`cost`]      | `CostModel`, `TraversalModel`, `EdgeProbabilities`        |
//! | [`source`]    | `GraphSource` port for road-network providers             |
//! | [`osm`]       | `PbfSource` (feature = `"osm"` only)                      |
//! | [`error`]     | `GraphError`, `SourceError`                               |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                          |
//! |-------|-----------------------------------------------------------------|
//! | `osm` | Enables `PbfSource`, reading a local extract via `osmpbf`.      |

pub mod cost;
pub mod edit;
pub mod error;
pub mod graph;
pub mod index;
pub mod integrate;
pub mod request;
pub mod source;
pub mod split;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use cost::{CostModel, EdgeKey, EdgeProbabilities, ModelError, TraversalModel};
pub use edit::{EdgeModification, edit_edge_states};
pub use error::{GraphError, GraphResult, SourceError};
pub use graph::{Edge, EdgeState, Node, RoadGraph};
pub use index::EdgeIndex;
pub use integrate::{SnapPolicy, integrate_points};
pub use request::{DedupPolicy, PointKind, PointRequest, SnappedNode, deduplicate};
pub use source::GraphSource;
pub use split::{split_edge, try_split_edge};
