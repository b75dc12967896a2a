//! Polling Pipeline Service Provider Interface
//!
//! Defines traits and types for the incremental CSV polling pipeline.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{AnomalySink, CursorStore, ExternalDetector};
pub use error::{PipelineError, Result};
pub use model::{AnomalyRecord, MetricRow};
