//! Streaming Detector Facade
//!
//! Unified re-exports for the detector module:
//! - `StreamingDetector` trait and data model from SPI
//! - Configuration types and `AlgorithmKind` from API
//! - Detector implementations and the factory from Core

// Re-export everything from SPI
pub use detector_spi::*;

// Re-export everything from API
pub use detector_api::*;

// Re-export everything from Core
pub use detector_core::*;
