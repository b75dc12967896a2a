//! Polling Pipeline Facade
//!
//! Single import surface for the polling pipeline: contracts, config
//! types, and implementations.

pub use pipeline_api::*;
pub use pipeline_core::*;
pub use pipeline_spi::*;
