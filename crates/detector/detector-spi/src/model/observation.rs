//! Observation type consumed by streaming detectors.

use serde::{Deserialize, Serialize};

/// A single scalar observation. Immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// The metric value.
    pub value: f64,
    /// Optional timestamp (epoch units, opaque to detectors).
    pub timestamp: Option<i64>,
    /// Optional integer sub-identifier, e.g. a process id.
    pub pid: Option<i64>,
    /// Optional ground-truth label.
    pub label: Option<bool>,
}

impl Observation {
    /// Create an observation carrying only a value.
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            timestamp: None,
            pid: None,
            label: None,
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl From<f64> for Observation {
    fn from(value: f64) -> Self {
        Self::from_value(value)
    }
}
