//! Introspection snapshots exposed by detectors.

use serde::{Deserialize, Serialize};

/// Rolling-window statistics snapshot from the fixed-window detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
    /// Number of values currently buffered.
    pub window_size: usize,
    pub multiplier: f64,
    /// mean + multiplier * std_dev
    pub threshold_upper: f64,
    /// mean - multiplier * std_dev
    pub threshold_lower: f64,
}

/// Live parameter set of the adaptive detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveParams {
    pub sigma_multiplier: f64,
    pub window_size: usize,
    pub alpha: f64,
    pub warmup_samples: usize,
    /// Whether the one-shot burn-in optimization has run.
    pub optimized: bool,
    pub current_mean: f64,
    pub current_std: f64,
}
