//! `layerclaw load|priorities|wake|access|reset` — memory layer commands.

use super::{CliResult, load_config, open_memory, preview, print_json, priority_bar};
use layerclaw_core::Layer;
use layerclaw_memory::MetadataStore;
use serde::Serialize;

/// One row of `layerclaw priorities --json`.
#[derive(Debug, Serialize)]
struct PriorityRow {
    layer: Layer,
    priority: f64,
}

fn priority_rows(ranked: Vec<(Layer, f64)>) -> Vec<PriorityRow> {
    ranked
        .into_iter()
        .map(|(layer, priority)| PriorityRow { layer, priority })
        .collect()
}

pub fn priorities(json: bool) -> CliResult {
    let config = load_config()?;
    let memory = open_memory(&config)?;

    if json {
        print_json(&priority_rows(memory.ranked_priorities()))?;
        return Ok(());
    }

    println!("Memory Priorities:");
    for (layer, priority) in memory.ranked_priorities() {
        println!("  {:15} [{}] {priority:.2}", layer.as_str(), priority_bar(priority));
    }

    Ok(())
}

pub fn load(preview_chars: usize, json: bool) -> CliResult {
    let config = load_config()?;
    let mut memory = open_memory(&config)?;

    if json {
        print_json(&memory.smart_load()?)?;
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("LAYERCLAW SMART MEMORY");
    println!("{}", "=".repeat(60));

    println!("\nMemory Priorities:");
    for (layer, priority) in memory.ranked_priorities() {
        println!("  {:15} [{}] {priority:.2}", layer.as_str(), priority_bar(priority));
    }

    println!("\n{}", "=".repeat(60));
    println!("LOADING MEMORIES (Priority Order)");
    println!("{}", "=".repeat(60));

    let loaded = memory.smart_load()?;
    if loaded.is_empty() {
        println!("\n  No layers above the load threshold ({:.2}).", memory.policy().load_threshold);
    }
    for item in loaded {
        let rule = "=".repeat(20);
        println!("\n{rule} {} (p={:.2}) {rule}", item.layer, item.priority);
        println!("{}", preview(&item.content, preview_chars));
    }

    Ok(())
}

pub fn wake() -> CliResult {
    let config = load_config()?;
    let memory = open_memory(&config)?;

    if memory.is_first_wake() {
        println!("No long-term memory yet in {}.", config.memory.dir().display());
        println!("Write LONG_TERM.md there to give the agent its permanent memory.");
        return Ok(());
    }

    for item in memory.load_all()? {
        let rule = "=".repeat(20);
        println!("\n{rule} {} {rule}", item.layer.file_name());
        println!("{}", item.content);
    }

    Ok(())
}

pub fn access(layer: &str) -> CliResult {
    let config = load_config()?;
    let mut memory = open_memory(&config)?;

    // Canonicalize known spellings (soul, SOUL.md); keep anything else verbatim
    let name = layer
        .parse::<layerclaw_core::Layer>()
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|_| layer.to_string());

    memory.access(&name)?;
    if let Some(stat) = memory.stat(&name) {
        println!(
            "{name}: {} accesses, importance {:.2}, priority {:.2}",
            stat.access_count,
            stat.importance,
            memory.priority(&name)
        );
    }

    Ok(())
}

pub fn reset(confirm: bool) -> CliResult {
    if !confirm {
        println!("This will delete ALL layer statistics permanently.");
        println!("   Run with --confirm to proceed:");
        println!("   layerclaw reset --confirm");
        return Ok(());
    }

    let config = load_config()?;
    let store = MetadataStore::new(config.memory.metadata_path());
    if store.clear()? {
        println!("Deleted {}.", store.path().display());
    } else {
        println!("No layer statistics recorded yet.");
    }

    Ok(())
}
