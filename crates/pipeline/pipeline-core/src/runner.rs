//! Per-source detection runner.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use detector_api::AlgorithmKind;
use detector_core::{build_detector, Detector};
use detector_spi::{Observation, StreamingDetector};
use pipeline_spi::{
    AnomalyRecord, AnomalySink, CursorStore, ExternalDetector, PipelineError, Result,
};
use tracing::{debug, info};

use crate::cursor;

/// Detection backend for one source: either a local streaming detector or
/// an externally injected routine.
pub enum SourceDetector {
    Builtin(Detector),
    External(Arc<dyn ExternalDetector>),
}

/// Outcome of one polling cycle over one source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleOutcome {
    pub rows_read: u64,
    pub anomalies: u64,
    pub new_cursor: u64,
}

/// Drives detection for a single source CSV across polling cycles.
///
/// The runner owns the detector instance, so its learned state survives
/// between cycles for the lifetime of the polling session.
pub struct DetectionRunner {
    source: PathBuf,
    metric: String,
    detector: SourceDetector,
}

impl std::fmt::Debug for DetectionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionRunner")
            .field("source", &self.source)
            .field("metric", &self.metric)
            .finish_non_exhaustive()
    }
}

impl DetectionRunner {
    /// Build a runner for `source` using the named algorithm. Names the
    /// local factory does not construct are routed to `external`.
    pub fn new(
        source: impl Into<PathBuf>,
        algorithm: &str,
        external: Option<Arc<dyn ExternalDetector>>,
    ) -> Result<Self> {
        let source = source.into();
        let kind = AlgorithmKind::parse(algorithm)?;
        let detector = if kind.is_builtin() {
            SourceDetector::Builtin(build_detector(kind)?)
        } else {
            match external {
                Some(external) => SourceDetector::External(external),
                None => return Err(PipelineError::MissingExternalDetector(source)),
            }
        };
        let metric = cursor::metric_name_for(&source);
        Ok(Self {
            source,
            metric,
            detector,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Run one cycle: read the rows past the stored cursor, detect, append
    /// findings, and advance the cursor to the current row count.
    ///
    /// A missing source leaves the cursor untouched. A batch that fails to
    /// parse still advances the cursor, so a malformed append is skipped
    /// rather than retried forever.
    pub fn run_cycle(
        &mut self,
        store: &mut dyn CursorStore,
        sink: &dyn AnomalySink,
        anomaly_file: &Path,
    ) -> Result<CycleOutcome> {
        if !self.source.exists() {
            debug!(source = %self.source.display(), "source absent, skipping cycle");
            return Ok(CycleOutcome::default());
        }

        let since = store.position(&self.source);
        let mut outcome = CycleOutcome::default();

        match &mut self.detector {
            SourceDetector::Builtin(detector) => {
                let rows = cursor::read_rows_after(&self.source, since);
                outcome.rows_read = rows.len() as u64;

                let mut findings = Vec::new();
                for row in rows {
                    let verdict = detector.evaluate(&Observation::from_value(row.value));
                    if verdict.is_anomaly {
                        findings.push(AnomalyRecord {
                            timestamp: row.timestamp,
                            metric: self.metric.clone(),
                            pid: row.pid,
                            value: row.value,
                            score: verdict.score,
                        });
                    }
                }
                if !findings.is_empty() {
                    info!(
                        metric = %self.metric,
                        count = findings.len(),
                        "anomalies detected"
                    );
                    sink.append(&findings)?;
                }
                outcome.anomalies = findings.len() as u64;
            }
            SourceDetector::External(external) => {
                external.detect(&self.source, anomaly_file, &self.metric, since)?;
            }
        }

        outcome.new_cursor = cursor::line_count(&self.source);
        store.advance(&self.source, outcome.new_cursor);
        Ok(outcome)
    }
}
