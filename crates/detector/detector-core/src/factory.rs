//! Detector construction from algorithm identifiers.

use detector_api::{
    AdaptiveThreeSigmaConfig, AlgorithmKind, KnnCadConfig, Result, ThreeSigmaConfig,
};
use detector_spi::{DetectorError, Observation, StreamingDetector};

use crate::{AdaptiveThreeSigmaDetector, KnnCadDetector, ThreeSigmaDetector};

/// Tagged union over the built-in detector variants.
///
/// One instance is created per source the first time that source appears
/// in the assignment mapping, and lives for the polling session.
#[derive(Debug, Clone)]
pub enum Detector {
    ThreeSigma(ThreeSigmaDetector),
    AdaptiveThreeSigma(AdaptiveThreeSigmaDetector),
    KnnCad(KnnCadDetector),
}

impl Detector {
    pub fn three_sigma(config: ThreeSigmaConfig) -> Self {
        Self::ThreeSigma(ThreeSigmaDetector::new(config))
    }

    pub fn adaptive_three_sigma(config: AdaptiveThreeSigmaConfig) -> Self {
        Self::AdaptiveThreeSigma(AdaptiveThreeSigmaDetector::new(config))
    }

    pub fn knn_cad(config: KnnCadConfig) -> Result<Self> {
        Ok(Self::KnnCad(KnnCadDetector::new(config)?))
    }
}

impl StreamingDetector for Detector {
    fn fit(&mut self, obs: &Observation) {
        match self {
            Self::ThreeSigma(d) => d.fit(obs),
            Self::AdaptiveThreeSigma(d) => d.fit(obs),
            Self::KnnCad(d) => d.fit(obs),
        }
    }

    fn score(&mut self, obs: &Observation) -> f64 {
        match self {
            Self::ThreeSigma(d) => d.score(obs),
            Self::AdaptiveThreeSigma(d) => d.score(obs),
            Self::KnnCad(d) => d.score(obs),
        }
    }

    fn predict(&self, score: f64) -> bool {
        match self {
            Self::ThreeSigma(d) => d.predict(score),
            Self::AdaptiveThreeSigma(d) => d.predict(score),
            Self::KnnCad(d) => d.predict(score),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::ThreeSigma(d) => d.reset(),
            Self::AdaptiveThreeSigma(d) => d.reset(),
            Self::KnnCad(d) => d.reset(),
        }
    }
}

/// Build a detector with default parameters for `kind`.
///
/// `Multivariate` is never constructed locally; callers route it to the
/// injected external detector instead.
pub fn build_detector(kind: AlgorithmKind) -> Result<Detector> {
    match kind {
        AlgorithmKind::ThreeSigma => Ok(Detector::three_sigma(ThreeSigmaConfig::default())),
        AlgorithmKind::AdaptiveThreeSigma => Ok(Detector::adaptive_three_sigma(
            AdaptiveThreeSigmaConfig::default(),
        )),
        AlgorithmKind::KnnCad => Detector::knn_cad(KnnCadConfig::default()),
        AlgorithmKind::Multivariate => Err(DetectorError::UnsupportedAlgorithm(
            AlgorithmKind::Multivariate.as_str().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_all_builtin_variants() {
        assert!(matches!(
            build_detector(AlgorithmKind::ThreeSigma).unwrap(),
            Detector::ThreeSigma(_)
        ));
        assert!(matches!(
            build_detector(AlgorithmKind::AdaptiveThreeSigma).unwrap(),
            Detector::AdaptiveThreeSigma(_)
        ));
        assert!(matches!(
            build_detector(AlgorithmKind::KnnCad).unwrap(),
            Detector::KnnCad(_)
        ));
    }

    #[test]
    fn test_multivariate_is_not_constructible() {
        let err = build_detector(AlgorithmKind::Multivariate).unwrap_err();
        assert!(matches!(err, DetectorError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn test_dispatch_through_enum() {
        let mut detector = build_detector(AlgorithmKind::ThreeSigma).unwrap();
        for i in 0..60 {
            detector.fit(&Observation::from_value((i % 5) as f64));
        }
        let score = detector.score(&Observation::from_value(1000.0));
        assert!(detector.predict(score));
    }
}
