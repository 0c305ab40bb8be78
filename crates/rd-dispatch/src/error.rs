//! Error types for rd-dispatch.

use thiserror::Error;

use rd_core::NodeId;

/// Errors that can occur during routing and dispatch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    /// Survivors were supplied with nowhere to send a vehicle from.
    #[error("no pickup points supplied")]
    NoPickups,

    /// No path exists between two nodes.  Absorbed by the dispatch loop.
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    /// A survivor group with `urgency² + count == 0` cannot be scored.
    #[error("survivor group at {0} has zero urgency and zero count")]
    ZeroWeight(NodeId),
}

/// Alias for `Result<T, DispatchError>`.
pub type DispatchResult<T> = Result<T, DispatchError>;
