//! Streaming Detector API
//!
//! Configuration types and algorithm identifiers for streaming anomaly
//! detection.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use detector_spi::{
    AdaptiveParams, DetectorError, Observation, Result, StreamingDetector, Verdict, WindowStats,
};

// ============================================================================
// Algorithm identifiers
// ============================================================================

/// Detection algorithm variants, as named in the assignment mapping.
///
/// `Multivariate` is recognized but not implemented here; the pipeline
/// routes it to an externally injected detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    ThreeSigma,
    AdaptiveThreeSigma,
    KnnCad,
    Multivariate,
}

impl AlgorithmKind {
    /// Parse an algorithm name from an assignment mapping.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "three-sigma" => Ok(Self::ThreeSigma),
            "adaptive-three-sigma" => Ok(Self::AdaptiveThreeSigma),
            "knn-cad" => Ok(Self::KnnCad),
            "multivariate" => Ok(Self::Multivariate),
            other => Err(DetectorError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Canonical mapping-file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeSigma => "three-sigma",
            Self::AdaptiveThreeSigma => "adaptive-three-sigma",
            Self::KnnCad => "knn-cad",
            Self::Multivariate => "multivariate",
        }
    }

    /// True for variants constructed by the local factory.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Multivariate)
    }
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Fixed-window three-sigma detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeSigmaConfig {
    /// Rolling window length (default: 50).
    pub window_len: usize,
    /// Sigma multiplier for the verdict threshold (default: 3.0).
    pub multiplier: f64,
}

impl Default for ThreeSigmaConfig {
    fn default() -> Self {
        Self {
            window_len: 50,
            multiplier: 3.0,
        }
    }
}

impl ThreeSigmaConfig {
    pub fn new(window_len: usize, multiplier: f64) -> Self {
        Self {
            window_len,
            multiplier,
        }
    }
}

/// Adaptive (EWMA-controlled) three-sigma detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveThreeSigmaConfig {
    /// Sigma multiplier (default: 3.0).
    pub sigma_multiplier: f64,
    /// Rolling buffer size (default: 50).
    pub window_size: usize,
    /// Exponential smoothing weight in (0, 1] (default: 0.1).
    pub alpha: f64,
    /// Observations required before statistics update (default: 100).
    pub warmup_samples: usize,
    /// Run the one-shot burn-in grid optimization (default: true).
    pub auto_optimize: bool,
}

impl Default for AdaptiveThreeSigmaConfig {
    fn default() -> Self {
        Self {
            sigma_multiplier: 3.0,
            window_size: 50,
            alpha: 0.1,
            warmup_samples: 100,
            auto_optimize: true,
        }
    }
}

/// KNN-CAD detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnCadConfig {
    /// Total window length L; the current window takes floor(sqrt(L)) of
    /// it and the historical buffer the rest (default: 100).
    pub window_len: usize,
    /// Neighbor count; must be strictly less than the historical buffer
    /// capacity (default: 5).
    pub k_neighbor: usize,
    /// Min-max normalize raw scores into [0, 1] (default: true).
    pub normalize_score: bool,
}

impl Default for KnnCadConfig {
    fn default() -> Self {
        Self {
            window_len: 100,
            k_neighbor: 5,
            normalize_score: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(
            AlgorithmKind::parse("three-sigma").unwrap(),
            AlgorithmKind::ThreeSigma
        );
        assert_eq!(
            AlgorithmKind::parse("adaptive-three-sigma").unwrap(),
            AlgorithmKind::AdaptiveThreeSigma
        );
        assert_eq!(AlgorithmKind::parse("knn-cad").unwrap(), AlgorithmKind::KnnCad);
        assert_eq!(
            AlgorithmKind::parse("multivariate").unwrap(),
            AlgorithmKind::Multivariate
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = AlgorithmKind::parse("spectral-residual").unwrap_err();
        assert!(matches!(err, DetectorError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn test_round_trip_names() {
        for kind in [
            AlgorithmKind::ThreeSigma,
            AlgorithmKind::AdaptiveThreeSigma,
            AlgorithmKind::KnnCad,
            AlgorithmKind::Multivariate,
        ] {
            assert_eq!(AlgorithmKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_multivariate_is_not_builtin() {
        assert!(!AlgorithmKind::Multivariate.is_builtin());
        assert!(AlgorithmKind::ThreeSigma.is_builtin());
    }
}
