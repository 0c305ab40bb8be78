//! Error types for rd-cache.

use thiserror::Error;

use rd_core::BoundingBox;
use rd_graph::SourceError;

use crate::key::CacheKeyError;

/// Errors that can occur while reading, writing, or filling the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The graph source could not supply a graph for the area.  Not retried.
    #[error("no road graph available for {bbox}: {source}")]
    GraphUnavailable {
        bbox:   BoundingBox,
        #[source]
        source: SourceError,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("graph (de)serialisation error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Key(#[from] CacheKeyError),

    #[error("cache connection lock poisoned")]
    Poisoned,
}

/// Alias for `Result<T, CacheError>`.
pub type CacheResult<T> = Result<T, CacheError>;
