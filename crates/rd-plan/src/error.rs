//! Error types for rd-plan.

use thiserror::Error;

use rd_cache::CacheError;
use rd_core::CoreError;
use rd_dispatch::DispatchError;
use rd_graph::GraphError;

/// Top-level error for planner operations.
///
/// `InvalidRequest` and `Core` are the caller's fault; `Cache` wraps
/// `GraphUnavailable` when the area has no road data.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl PlanError {
    /// `true` for failures a client can fix by changing its request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlanError::InvalidRequest(_)
                | PlanError::Core(_)
                | PlanError::Cache(CacheError::GraphUnavailable { .. })
                | PlanError::Dispatch(DispatchError::NoPickups)
        )
    }
}

/// Alias for `Result<T, PlanError>`.
pub type PlanResult<T> = Result<T, PlanError>;
