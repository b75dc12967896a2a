//! Pipeline error types.

use std::path::PathBuf;

use detector_spi::DetectorError;
use thiserror::Error;

/// Polling pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("Unsupported algorithm '{algorithm}' for source {path:?}")]
    UnsupportedAssignment { path: PathBuf, algorithm: String },

    #[error("No external detector registered for source {0:?}")]
    MissingExternalDetector(PathBuf),

    #[error("External detection failed: {0}")]
    External(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_assignment_display() {
        let error = PipelineError::UnsupportedAssignment {
            path: PathBuf::from("/data/cpu.csv"),
            algorithm: "spectral".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported algorithm 'spectral' for source \"/data/cpu.csv\""
        );
    }

    #[test]
    fn test_detector_error_is_transparent() {
        let inner = DetectorError::UnsupportedAlgorithm("x".to_string());
        let error = PipelineError::from(inner);
        assert_eq!(error.to_string(), "Unsupported algorithm: x");
    }

    #[test]
    fn test_io_error_wraps_source() {
        let error =
            PipelineError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(error.to_string().contains("gone"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PipelineError>();
    }
}
