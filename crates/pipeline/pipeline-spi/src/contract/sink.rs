//! Anomaly sink trait definition.

use crate::error::Result;
use crate::model::AnomalyRecord;

/// Append-only destination for detected anomalies.
///
/// Implementations must be safe for concurrent append from independent
/// worker threads; each call covers one batch and must not hold the
/// destination open across polling cycles.
pub trait AnomalySink: Send + Sync {
    /// Append one batch of records.
    fn append(&self, records: &[AnomalyRecord]) -> Result<()>;
}
