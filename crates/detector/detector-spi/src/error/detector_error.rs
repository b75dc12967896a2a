//! Detector error types.

use thiserror::Error;

/// Streaming detector errors.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Result type for detector operations.
pub type Result<T> = std::result::Result<T, DetectorError>;
