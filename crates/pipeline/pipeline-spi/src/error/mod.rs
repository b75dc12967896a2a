//! Error types for the polling pipeline.
//!
//! This module contains error types and the Result alias.

mod pipeline_error;

pub use pipeline_error::{PipelineError, Result};
