//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` through a
//! `#[from]` variant where validation failures need to cross crate lines.

use thiserror::Error;

/// Errors raised while validating core values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("a polyline needs at least 2 points, got {0}")]
    DegeneratePolyline(usize),
}

/// Shorthand result type for `rd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
