//! Layer document sources — a directory of markdown files, or an in-memory map.

use layerclaw_core::error::MemoryError;
use layerclaw_core::{Layer, LayerDocuments};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Layer documents stored as `<LAYER>.md` files in one directory.
///
/// Storage location: `~/.layerclaw/workspace/` by default.
#[derive(Debug, Clone)]
pub struct DirectoryDocuments {
    dir: PathBuf,
}

impl DirectoryDocuments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a layer's document.
    pub fn path_for(&self, layer: Layer) -> PathBuf {
        self.dir.join(layer.file_name())
    }
}

impl LayerDocuments for DirectoryDocuments {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(&self, layer: Layer) -> Result<Option<String>, MemoryError> {
        let path = self.path_for(layer);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(layer = %layer, path = %path.display(), "No document for layer");
                Ok(None)
            }
            Err(e) => Err(MemoryError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn exists(&self, layer: Layer) -> bool {
        self.path_for(layer).is_file()
    }
}

/// Layer documents held in memory. Useful for testing and embedding.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    docs: RwLock<HashMap<Layer, String>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, layer: Layer, content: impl Into<String>) -> Result<(), MemoryError> {
        self.docs
            .write()
            .map_err(|e| MemoryError::Storage(format!("Document map poisoned: {e}")))?
            .insert(layer, content.into());
        Ok(())
    }

    /// Remove a layer's document. Returns whether one was present.
    pub fn remove(&self, layer: Layer) -> Result<bool, MemoryError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|e| MemoryError::Storage(format!("Document map poisoned: {e}")))?;
        Ok(docs.remove(&layer).is_some())
    }
}

impl LayerDocuments for InMemoryDocuments {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(&self, layer: Layer) -> Result<Option<String>, MemoryError> {
        let docs = self
            .docs
            .read()
            .map_err(|e| MemoryError::Storage(format!("Document map poisoned: {e}")))?;
        Ok(docs.get(&layer).cloned())
    }
}
