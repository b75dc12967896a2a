//! Data models for streaming anomaly detection.
//!
//! This module contains data structures used throughout the detection system.

mod observation;
mod verdict;
mod statistics;

pub use observation::Observation;
pub use verdict::Verdict;
pub use statistics::{AdaptiveParams, WindowStats};
