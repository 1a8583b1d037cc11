//! Centralized error types for the Waymark workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaymarkError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WaymarkResult<T> = Result<T, WaymarkError>;
