//! External detector trait definition.

use std::path::Path;

use crate::error::Result;

/// Externally implemented detection routine.
///
/// The assignment mapping may name algorithm variants this crate does not
/// implement (e.g. a multivariate detector); those sources are routed here.
/// The implementation reads `source` past `since_line` data rows and
/// appends its own findings to `output`.
pub trait ExternalDetector: Send + Sync {
    fn detect(&self, source: &Path, output: &Path, metric_name: &str, since_line: u64)
        -> Result<()>;
}
