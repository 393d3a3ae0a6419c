//! CLI subcommands and the wiring they share.

pub mod init;
pub mod learn;
pub mod memory;

use layerclaw_config::{AppConfig, PriorityConfig};
use layerclaw_core::{Error, Result, SystemClock};
use layerclaw_memory::{DirectoryDocuments, LearningLog, MetadataStore, ScoringPolicy, SmartMemory};
use serde::Serialize;
use std::sync::Arc;

pub type CliResult = std::result::Result<(), Box<dyn std::error::Error>>;

pub fn load_config() -> Result<AppConfig> {
    AppConfig::load().map_err(|e| Error::Config {
        message: format!("Failed to load config: {e}"),
    })
}

pub fn scoring_policy(priority: &PriorityConfig) -> ScoringPolicy {
    ScoringPolicy {
        access_weight: priority.access_weight,
        recency_weight: priority.recency_weight,
        importance_weight: priority.importance_weight,
        load_threshold: priority.load_threshold,
    }
}

/// Open the smart memory engine over the configured directory.
pub fn open_memory(config: &AppConfig) -> Result<SmartMemory> {
    let memory = SmartMemory::open(
        MetadataStore::new(config.memory.metadata_path()),
        Arc::new(DirectoryDocuments::new(config.memory.dir())),
        Arc::new(SystemClock),
    )?
    .with_policy(scoring_policy(&config.priority));
    Ok(memory)
}

pub fn open_learning(config: &AppConfig) -> Result<LearningLog> {
    Ok(LearningLog::open(
        config.memory.learning_path(),
        Arc::new(SystemClock),
    )?)
}

/// Pretty-print any serializable result as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// A 20-cell bar for a score in [0, 1].
pub fn priority_bar(priority: f64) -> String {
    let filled = (priority.clamp(0.0, 1.0) * 20.0) as usize;
    format!("{:<20}", "█".repeat(filled))
}

/// The first `max_chars` characters of `content`, with an ellipsis if cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
