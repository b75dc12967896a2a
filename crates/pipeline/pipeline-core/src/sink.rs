//! Append-only CSV anomaly sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use pipeline_spi::{AnomalyRecord, AnomalySink, Result};

/// Anomaly sink writing `timestamp,metric[,pid],value,score` lines.
///
/// The file is opened in append mode and closed again for every batch, so
/// concurrent readers always see complete lines and the file can be
/// rotated between cycles.
#[derive(Debug)]
pub struct CsvFileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

impl AnomalySink for CsvFileSink {
    fn append(&self, records: &[AnomalyRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        // Serialize writers so batches from worker threads never interleave.
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            writeln!(file, "{}", record.to_csv_line())?;
        }
        Ok(())
    }
}
