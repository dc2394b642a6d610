//! Error types for geometry operations.
//!
//! These never reach pipeline callers directly; the boolean engine
//! reports them inside [`crate::boolean::BooleanOutcome::Fallback`].

use thiserror::Error;

/// Reasons a geometry operation could not produce a combined result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An input polygon held a NaN or infinite coordinate.
    #[error("Non-finite coordinate in polygon {index}")]
    NonFiniteCoordinate { index: usize },

    /// The clipping engine failed internally.
    #[error("Boolean engine failure: {0}")]
    EngineFailure(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
