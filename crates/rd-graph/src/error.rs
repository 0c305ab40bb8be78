//! Graph-subsystem error types.

use thiserror::Error;

use rd_core::{BoundingBox, CoreError, NodeId};

/// Errors produced while building or mutating a `RoadGraph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge ({u}, {v}, key {key}) not found")]
    EdgeNotFound { u: NodeId, v: NodeId, key: u32 },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge arena is full")]
    ArenaFull,

    #[error("graph has no edges to snap onto")]
    NoEdges,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors reported by a road-network provider.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no usable road data in {0}")]
    NoData(BoundingBox),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graph source failed: {0}")]
    Other(String),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}
