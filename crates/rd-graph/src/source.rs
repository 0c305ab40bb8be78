//! Port for road-network providers.

use rd_core::BoundingBox;

use crate::error::SourceError;
use crate::graph::RoadGraph;

/// Produces the drivable road network inside a bounding box.
///
/// Implemented for any `Fn(&BoundingBox) -> Result<RoadGraph, SourceError>`,
/// so tests and demos can pass a closure.
pub trait GraphSource: Send + Sync {
    fn fetch(&self, bbox: &BoundingBox) -> Result<RoadGraph, SourceError>;
}

impl<F> GraphSource for F
where
    F: Fn(&BoundingBox) -> Result<RoadGraph, SourceError> + Send + Sync,
{
    fn fetch(&self, bbox: &BoundingBox) -> Result<RoadGraph, SourceError> {
        self(bbox)
    }
}
