//! Layer document trait — where the text of each memory layer lives.
//!
//! The prioritizer only cares whether a layer's document exists and what its
//! full text is. Implementations: directory of markdown files, in-memory map
//! (for testing).

use crate::error::MemoryError;
use crate::layer::Layer;

/// Read-only access to layer documents.
pub trait LayerDocuments: Send + Sync {
    /// The source name (e.g., "directory", "in_memory").
    fn name(&self) -> &str;

    /// Fetch the full text of a layer's document.
    ///
    /// Returns `Ok(None)` when the document does not exist; that is the normal
    /// state for layers that were never written and must not be an error.
    fn fetch(&self, layer: Layer) -> Result<Option<String>, MemoryError>;

    /// Whether the layer's document exists.
    fn exists(&self, layer: Layer) -> bool {
        matches!(self.fetch(layer), Ok(Some(_)))
    }
}
