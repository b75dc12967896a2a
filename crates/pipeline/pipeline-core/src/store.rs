//! JSON-backed cursor store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pipeline_spi::{CursorStore, Result};
use tracing::warn;

/// Cursor store persisted as a JSON object of `path -> data-row count`.
///
/// Loading tolerates a missing or malformed state file by starting empty;
/// a corrupt state file costs a re-scan, never a crash.
#[derive(Debug)]
pub struct JsonCursorStore {
    path: PathBuf,
    offsets: BTreeMap<PathBuf, u64>,
}

impl JsonCursorStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let offsets = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(offsets) => offsets,
                Err(err) => {
                    warn!(state_file = %path.display(), error = %err, "malformed state file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl CursorStore for JsonCursorStore {
    fn position(&self, source: &Path) -> u64 {
        self.offsets.get(source).copied().unwrap_or(0)
    }

    fn advance(&mut self, source: &Path, line: u64) {
        self.offsets.insert(source.to_path_buf(), line);
    }

    fn forget(&mut self, source: &Path) {
        self.offsets.remove(source);
    }

    fn persist(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.offsets)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
