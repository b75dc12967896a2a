//! One parsed data row from a telemetry CSV.

use serde::{Deserialize, Serialize};

/// A single CSV data row. The timestamp (and pid, if present) are opaque
/// strings passed through verbatim to the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRow {
    pub timestamp: String,
    /// Pid column content, when the source carries one.
    pub pid: Option<String>,
    pub value: f64,
}

impl MetricRow {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            pid: None,
            value,
        }
    }

    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }
}
