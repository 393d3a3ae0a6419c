//! Error types for the LayerClaw domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Absent state (first run, missing documents, unknown hook handles) is
//! never an error; only corruption and I/O failures surface here.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all LayerClaw operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum MemoryError {
    /// A persisted snapshot exists but could not be parsed.
    #[error("Corrupt snapshot at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl MemoryError {
    /// Whether this error means persisted data is unreadable (as opposed to an I/O hiccup).
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_error_displays_path() {
        let err = Error::Memory(MemoryError::Corrupt {
            path: PathBuf::from("/tmp/.memory_meta.json"),
            reason: "expected value at line 1 column 1".into(),
        });
        assert!(err.to_string().contains(".memory_meta.json"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn memory_error_converts_with_question_mark() {
        fn open() -> Result<()> {
            Err(MemoryError::Storage("disk full".into()))?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, Error::Memory(MemoryError::Storage(_))));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn serde_error_converts_with_question_mark() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{")?)
        }
        assert!(matches!(parse().unwrap_err(), Error::Serialization(_)));
    }

    #[test]
    fn storage_error_is_not_corruption() {
        let err = MemoryError::Storage("disk full".into());
        assert!(!err.is_corruption());
        assert!(
            MemoryError::Corrupt {
                path: PathBuf::new(),
                reason: String::new(),
            }
            .is_corruption()
        );
    }
}
