//! Output record for one detected anomaly.

use serde::{Deserialize, Serialize};

/// One anomaly, as appended to the output sink.
///
/// Serialized line format: `timestamp,metric[,pid],value,score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub timestamp: String,
    pub metric: String,
    pub pid: Option<String>,
    pub value: f64,
    pub score: f64,
}

impl AnomalyRecord {
    /// Render the record as one comma-separated output line (no newline).
    pub fn to_csv_line(&self) -> String {
        match &self.pid {
            Some(pid) => format!(
                "{},{},{},{},{}",
                self.timestamp, self.metric, pid, self.value, self.score
            ),
            None => format!(
                "{},{},{},{}",
                self.timestamp, self.metric, self.value, self.score
            ),
        }
    }
}
