//! Polling Pipeline API
//!
//! Configuration types for the incremental CSV polling pipeline: the
//! source-to-algorithm assignment mapping and the scheduler settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use pipeline_spi::{
    AnomalyRecord, AnomalySink, CursorStore, ExternalDetector, MetricRow, PipelineError, Result,
};

// ============================================================================
// Polling Configuration
// ============================================================================

/// Scheduler settings for the polling pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// JSON file mapping source CSV paths to algorithm names.
    pub mapping_file: PathBuf,
    /// CSV file anomaly records are appended to.
    pub anomaly_file: PathBuf,
    /// JSON file cursor positions are persisted to.
    pub state_file: PathBuf,
    /// Seconds between polling cycles (default: 30).
    pub interval_secs: u64,
    /// Perform a single pass over every source and exit.
    pub run_once: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            mapping_file: PathBuf::from("mapping.json"),
            anomaly_file: PathBuf::from("anomalies.csv"),
            state_file: PathBuf::from("cursors.json"),
            interval_secs: 30,
            run_once: false,
        }
    }
}

// ============================================================================
// Algorithm Assignment
// ============================================================================

/// Source-to-algorithm assignment, loaded from the mapping file.
///
/// The mapping file is a JSON object whose keys are source CSV paths and
/// whose values are algorithm names. Entries are kept sorted by path so
/// that a polling pass visits sources in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmAssignment {
    entries: BTreeMap<PathBuf, String>,
}

impl AlgorithmAssignment {
    /// Load the assignment from a JSON mapping file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: BTreeMap<PathBuf, String> = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }

    /// Algorithm name assigned to a source, if any.
    pub fn algorithm_for(&self, source: &Path) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Iterate over `(source, algorithm)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries
            .iter()
            .map(|(path, algorithm)| (path.as_path(), algorithm.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, source: impl Into<PathBuf>, algorithm: impl Into<String>) {
        self.entries.insert(source.into(), algorithm.into());
    }

    /// Sources present in `newer` but not in `self`.
    pub fn added_in(&self, newer: &AlgorithmAssignment) -> Vec<PathBuf> {
        newer
            .entries
            .keys()
            .filter(|path| !self.entries.contains_key(*path))
            .cloned()
            .collect()
    }

    /// Sources present in `self` but not in `newer`.
    pub fn removed_in(&self, newer: &AlgorithmAssignment) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|path| !newer.entries.contains_key(*path))
            .cloned()
            .collect()
    }
}
