//! File-based snapshot persistence — whole-file JSON, written atomically.
//!
//! Both the layer statistics and the learning log are small documents that
//! are loaded whole, mutated in memory, and written whole after every change.
//! Writes go to a sibling `*.tmp` file which is then renamed over the target,
//! so a crash mid-write leaves the previous snapshot readable.
//!
//! There is no cross-process lock: two processes writing the same snapshot
//! race and the last writer wins.

use crate::stat::LayerStats;
use layerclaw_core::error::MemoryError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a JSON snapshot.
///
/// A missing file is `Ok(None)`. A file that exists but does not parse is
/// [`MemoryError::Corrupt`] so callers never mistake damage for a first run.
pub(crate) fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MemoryError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(MemoryError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| MemoryError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Write a JSON snapshot via temp-file-then-rename.
pub(crate) fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<(), MemoryError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create memory directory: {e}"))
            })?;
        }
    }

    let content = serde_json::to_string_pretty(value)
        .map_err(|e| MemoryError::Storage(format!("Failed to serialize snapshot: {e}")))?;

    let tmp = temp_path(path);
    let written = std::fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(MemoryError::Storage(format!(
            "Failed to write {}: {e}",
            tmp.display()
        )));
    }

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        MemoryError::Storage(format!("Failed to replace {}: {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Durable home of the layer statistics snapshot.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping. No snapshot yet means an empty mapping.
    pub fn load(&self) -> Result<LayerStats, MemoryError> {
        let stats = read_snapshot::<LayerStats>(&self.path)?.unwrap_or_default();
        debug!(path = %self.path.display(), layers = stats.len(), "Layer metadata loaded");
        Ok(stats)
    }

    /// Overwrite the snapshot with the full mapping.
    pub fn save(&self, stats: &LayerStats) -> Result<(), MemoryError> {
        write_snapshot(&self.path, stats)?;
        debug!(path = %self.path.display(), layers = stats.len(), "Layer metadata saved");
        Ok(())
    }

    /// Delete the snapshot. Returns whether one existed.
    ///
    /// Administrative reset; the engine never calls this itself.
    pub fn clear(&self) -> Result<bool, MemoryError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MemoryError::Storage(format!(
                "Failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
