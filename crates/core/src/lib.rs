//! # LayerClaw Core
//!
//! Domain types, traits, and error definitions for the LayerClaw memory
//! prioritizer. This crate does no I/O of its own — it defines the domain
//! model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every outside collaborator is a trait here:
//! - [`Clock`] — the time source, injected so recency scoring is testable
//! - [`LayerDocuments`] — the storage holding each layer's text
//!
//! Implementations live in their respective crates.

pub mod clock;
pub mod document;
pub mod error;
pub mod layer;

// Re-export key types at crate root for ergonomics
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use document::LayerDocuments;
pub use error::{Error, MemoryError, Result};
pub use layer::{Layer, UnknownLayer};
