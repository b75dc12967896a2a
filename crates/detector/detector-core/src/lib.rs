//! Streaming Detector Core
//!
//! Detector implementations: fixed-window three-sigma, adaptive
//! (EWMA-controlled) three-sigma with one-shot burn-in self-optimization,
//! and KNN-CAD with Mahalanobis distance.

mod adaptive;
mod factory;
mod knn;
mod matrix;
mod rolling;
mod three_sigma;
pub mod tuning;

pub use adaptive::AdaptiveThreeSigmaDetector;
pub use factory::{build_detector, Detector};
pub use knn::KnnCadDetector;
pub use rolling::RollingStats;
pub use three_sigma::ThreeSigmaDetector;
