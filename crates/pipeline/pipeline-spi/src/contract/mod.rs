//! Contract definitions for the polling pipeline.
//!
//! This module contains trait definitions that providers must implement.

mod cursor_store;
mod external_detector;
mod sink;

pub use cursor_store::CursorStore;
pub use external_detector::ExternalDetector;
pub use sink::AnomalySink;
