//! Error types for bilerp-transform

use thiserror::Error;

/// Errors that can occur while upscaling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] bilerp_core::Error),

    /// Rejected before any work begins (zero-sized grid, empty worker pool)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A programming defect detected while rows were being computed
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
