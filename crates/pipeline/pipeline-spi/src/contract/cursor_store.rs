//! Cursor store trait definition.

use std::path::Path;

use crate::error::Result;

/// Per-source read-offset store.
///
/// Offsets count data rows (the header is excluded). The store is read at
/// startup and persisted after each cycle so a restarted session resumes
/// where it left off.
pub trait CursorStore: Send {
    /// Last-processed data-row count for `source`, 0 if never seen.
    fn position(&self, source: &Path) -> u64;

    /// Record that `source` has been processed through `line` data rows.
    fn advance(&mut self, source: &Path, line: u64);

    /// Drop the entry for a source removed from the assignment mapping.
    fn forget(&mut self, source: &Path);

    /// Write the current offsets to backing storage.
    fn persist(&self) -> Result<()>;
}
