//! Data models for the polling pipeline.
//!
//! This module contains data structures passed between pipeline stages.

mod anomaly_record;
mod metric_row;

pub use anomaly_record::AnomalyRecord;
pub use metric_row::MetricRow;
