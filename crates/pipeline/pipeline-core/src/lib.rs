//! Polling Pipeline Core
//!
//! Incremental CSV ingestion, per-source detection runners, and the
//! polling scheduler that drives them.

pub mod cursor;
mod runner;
mod scheduler;
mod sink;
mod store;

pub use runner::{CycleOutcome, DetectionRunner, SourceDetector};
pub use scheduler::{PollingScheduler, RunSummary, ShutdownFlag};
pub use sink::CsvFileSink;
pub use store::JsonCursorStore;
