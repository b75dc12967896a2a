//! Incremental CSV reads.
//!
//! Sources are append-only CSV files with a header row. Cursor positions
//! count data rows, so a cursor of `n` means the first `n` rows after the
//! header have already been processed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pipeline_spi::MetricRow;
use tracing::warn;

/// Current number of data rows in `source`, 0 if the file is missing or
/// unreadable.
pub fn line_count(source: &Path) -> u64 {
    let file = match File::open(source) {
        Ok(file) => file,
        Err(_) => return 0,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));
    reader.byte_records().filter(|record| record.is_ok()).count() as u64
}

/// Read the data rows after the first `since` rows of `source`.
///
/// Any parse failure degrades the whole batch to empty; the caller still
/// advances its cursor past the bad region, matching the policy that a
/// malformed append never wedges a source.
pub fn read_rows_after(source: &Path, since: u64) -> Vec<MetricRow> {
    let file = match File::open(source) {
        Ok(file) => file,
        Err(err) => {
            warn!(source = %source.display(), error = %err, "failed to open source");
            return Vec::new();
        }
    };
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let value_index = match pid_column(&mut reader) {
        Ok(true) => 2,
        Ok(false) => 1,
        Err(err) => {
            warn!(source = %source.display(), error = %err, "failed to read header");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(source = %source.display(), error = %err, "malformed batch, skipping");
                return Vec::new();
            }
        };
        if (index as u64) < since {
            continue;
        }
        let timestamp = record.get(0).unwrap_or("").to_string();
        let value = match record.get(value_index).map(str::trim).map(str::parse::<f64>) {
            Some(Ok(value)) => value,
            _ => {
                warn!(source = %source.display(), row = index, "unparsable value, skipping batch");
                return Vec::new();
            }
        };
        let mut row = MetricRow::new(timestamp, value);
        if value_index == 2 {
            if let Some(pid) = record.get(1) {
                row = row.with_pid(pid);
            }
        }
        rows.push(row);
    }
    rows
}

/// Metric name for a source: the file stem of its path.
pub fn metric_name_for(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string_lossy().into_owned())
}

/// True when the second header column is a pid column, which shifts the
/// value column from index 1 to index 2.
fn pid_column(reader: &mut csv::Reader<BufReader<File>>) -> csv::Result<bool> {
    let headers = reader.headers()?;
    Ok(headers
        .get(1)
        .map(|name| name.trim().eq_ignore_ascii_case("pid"))
        .unwrap_or(false))
}
