//! Memory prioritization for LayerClaw.
//!
//! Tracks how often and how recently each memory layer is used, scores the
//! layers, and loads the ones worth surfacing. Alongside sits the learning
//! log, which records expectation/outcome pairs for actions.

pub mod documents;
pub mod engine;
pub mod learning;
pub mod priority;
pub mod stat;
pub mod store;

pub use documents::{DirectoryDocuments, InMemoryDocuments};
pub use engine::{LoadedLayer, SmartMemory};
pub use learning::{
    HookId, HookKind, Insight, InsightKind, LearningHook, LearningLog, LearningLogData,
    LearningStats, LOG_FORMAT_VERSION,
};
pub use priority::{NEUTRAL_PRIORITY, ScoringPolicy, rank};
pub use stat::{LayerStat, LayerStats};
pub use store::MetadataStore;
