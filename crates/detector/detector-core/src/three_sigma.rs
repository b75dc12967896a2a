//! Fixed-window three-sigma detector.

use detector_api::ThreeSigmaConfig;
use detector_spi::{Observation, StreamingDetector, WindowStats};

use crate::rolling::RollingStats;

/// Fixed-window z-score detector.
///
/// Keeps a rolling window of recent values and flags observations whose
/// absolute z-score exceeds a fixed sigma multiplier. Uses sample standard
/// deviation (ddof = 1).
#[derive(Debug, Clone)]
pub struct ThreeSigmaDetector {
    window: RollingStats,
    multiplier: f64,
    mean: f64,
    std_dev: f64,
}

impl ThreeSigmaDetector {
    /// Create a detector from configuration.
    pub fn new(config: ThreeSigmaConfig) -> Self {
        Self {
            window: RollingStats::new(config.window_len),
            multiplier: config.multiplier,
            mean: 0.0,
            std_dev: 0.0,
        }
    }

    /// Current sigma multiplier.
    pub fn threshold(&self) -> f64 {
        self.multiplier
    }

    /// Replace the sigma multiplier at runtime.
    pub fn set_threshold(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
    }

    /// Snapshot of the current window statistics and derived bounds.
    pub fn statistics(&self) -> WindowStats {
        WindowStats {
            mean: self.mean,
            std_dev: self.std_dev,
            window_size: self.window.len(),
            multiplier: self.multiplier,
            threshold_upper: self.mean + self.multiplier * self.std_dev,
            threshold_lower: self.mean - self.multiplier * self.std_dev,
        }
    }
}

impl Default for ThreeSigmaDetector {
    fn default() -> Self {
        Self::new(ThreeSigmaConfig::default())
    }
}

impl StreamingDetector for ThreeSigmaDetector {
    fn fit(&mut self, obs: &Observation) {
        self.window.push(obs.value);
        if self.window.len() >= 2 {
            self.mean = self.window.mean();
            self.std_dev = self.window.std(1);
        }
    }

    fn score(&mut self, obs: &Observation) -> f64 {
        if self.std_dev == 0.0 || self.window.len() < 2 {
            return 0.0;
        }
        (obs.value - self.mean).abs() / self.std_dev
    }

    fn predict(&self, score: f64) -> bool {
        score != 0.0 && score > self.multiplier
    }

    fn reset(&mut self) {
        self.window.clear();
        self.mean = 0.0;
        self.std_dev = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(value: f64) -> Observation {
        Observation::from_value(value)
    }

    #[test]
    fn test_identical_values_never_anomalous() {
        let mut detector = ThreeSigmaDetector::default();
        for _ in 0..60 {
            let score = detector.fit_score(&obs(7.5));
            assert_eq!(score, 0.0);
            assert!(!detector.predict(score));
        }
    }

    #[test]
    fn test_spike_after_flat_history() {
        let mut detector = ThreeSigmaDetector::new(ThreeSigmaConfig::new(50, 3.0));
        for _ in 0..49 {
            detector.fit_score(&obs(0.0));
        }
        // The spike itself enters the window before scoring, so std > 0
        let score = detector.fit_score(&obs(1000.0));
        assert!(score > 3.0);
        assert!(detector.predict(score));
    }

    #[test]
    fn test_insufficient_data_scores_zero() {
        let mut detector = ThreeSigmaDetector::default();
        let score = detector.fit_score(&obs(42.0));
        assert_eq!(score, 0.0);
        assert!(!detector.predict(score));
    }

    #[test]
    fn test_threshold_accessors() {
        let mut detector = ThreeSigmaDetector::default();
        assert_eq!(detector.threshold(), 3.0);
        detector.set_threshold(2.5);
        assert_eq!(detector.threshold(), 2.5);
    }

    #[test]
    fn test_statistics_bounds() {
        let mut detector = ThreeSigmaDetector::new(ThreeSigmaConfig::new(10, 2.0));
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            detector.fit(&obs(v));
        }
        let stats = detector.statistics();
        assert!((stats.mean - 3.0).abs() < 1e-10);
        assert_eq!(stats.window_size, 5);
        assert!((stats.threshold_upper - (stats.mean + 2.0 * stats.std_dev)).abs() < 1e-10);
        assert!((stats.threshold_lower - (stats.mean - 2.0 * stats.std_dev)).abs() < 1e-10);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut detector = ThreeSigmaDetector::default();
        for v in [1.0, 5.0, 9.0] {
            detector.fit(&obs(v));
        }
        detector.reset();
        assert_eq!(detector.fit_score(&obs(100.0)), 0.0);
        assert_eq!(detector.statistics().window_size, 1);
    }
}
