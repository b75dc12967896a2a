//! Per-observation verdict type.

use serde::{Deserialize, Serialize};

/// Outcome of scoring one observation.
///
/// Produced fresh per observation; detectors do not retain verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Anomaly severity, always >= 0. Zero means "insufficient data".
    pub score: f64,
    /// Binary anomaly flag.
    pub is_anomaly: bool,
}

impl Verdict {
    pub fn new(score: f64, is_anomaly: bool) -> Self {
        Self { score, is_anomaly }
    }

    /// A non-anomalous verdict with a zero score.
    pub fn normal() -> Self {
        Self {
            score: 0.0,
            is_anomaly: false,
        }
    }
}
