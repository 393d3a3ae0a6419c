//! End-to-end scenarios for the smart loader and the learning log, run
//! against a real memory directory.

use std::path::Path;
use std::sync::Arc;

use layerclaw_core::{Layer, ManualClock};
use layerclaw_memory::{
    DirectoryDocuments, LayerStat, LayerStats, LearningLog, MetadataStore, SmartMemory,
};
use serde_json::{Map, json};

const NOW: f64 = 1_760_000_000.0;
const HOUR: f64 = 3_600.0;

fn open(dir: &Path, clock: Arc<ManualClock>) -> SmartMemory {
    SmartMemory::open(
        MetadataStore::new(dir.join(".memory_meta.json")),
        Arc::new(DirectoryDocuments::new(dir)),
        clock,
    )
    .unwrap()
}

fn write_layer(dir: &Path, layer: Layer, text: &str) {
    std::fs::write(dir.join(layer.file_name()), text).unwrap();
}

#[test]
fn six_accesses_raise_importance_once() {
    let tmp = tempfile::tempdir().unwrap();
    write_layer(tmp.path(), Layer::Soul, "Curious and kind.");
    let mut memory = open(tmp.path(), Arc::new(ManualClock::new(NOW)));

    for _ in 0..6 {
        memory.access("SOUL").unwrap();
    }

    let stat = memory.stat(Layer::Soul).unwrap();
    assert_eq!(stat.access_count, 6);
    assert!((stat.importance - 0.55).abs() < 1e-12);
}

#[test]
fn importance_tracks_access_count() {
    let tmp = tempfile::tempdir().unwrap();
    let mut memory = open(tmp.path(), Arc::new(ManualClock::new(NOW)));

    let mut previous = 0.5;
    for count in 1..=20u64 {
        memory.access(Layer::Tools).unwrap();
        let importance = memory.stat(Layer::Tools).unwrap().importance;
        let expected = if count > 5 {
            (0.5 + (count - 5) as f64 * 0.05).min(1.0)
        } else {
            0.5
        };
        assert!((importance - expected).abs() < 1e-12, "count {count}");
        assert!(importance >= previous);
        previous = importance;
    }
}

#[test]
fn missing_document_never_loads() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(NOW - 2.0 * HOUR));
    write_layer(tmp.path(), Layer::Tools, "cargo, git, rg");

    let mut memory = open(tmp.path(), clock.clone());
    memory.access(Layer::Tools).unwrap();
    memory.access(Layer::Agents).unwrap();
    clock.set(NOW);

    let loaded = memory.smart_load().unwrap();
    let layers: Vec<Layer> = loaded.iter().map(|l| l.layer).collect();
    assert_eq!(layers, vec![Layer::Tools]);

    let expected = 0.03 + (1.0 - 2.0 * HOUR / 86_400.0) * 0.4 + 0.15;
    assert!((loaded[0].priority - expected).abs() < 1e-9);
    assert_eq!(loaded[0].content, "cargo, git, rg");

    // AGENTS qualified but had no document, so it was not touched
    assert_eq!(memory.stat(Layer::Agents).unwrap().access_count, 1);
}

#[test]
fn smart_load_is_ordered_and_thresholded() {
    let tmp = tempfile::tempdir().unwrap();
    for layer in Layer::ALL {
        write_layer(tmp.path(), layer, layer.as_str());
    }

    // Seed a snapshot: one hot layer, one stale rarely-used layer
    let mut stats = LayerStats::new();
    let mut hot = LayerStat::new(NOW - 10.0 * HOUR);
    for _ in 0..12 {
        hot.record_access(NOW - HOUR);
    }
    stats.insert("USER".into(), hot);
    let mut stale = LayerStat::new(NOW - 30.0 * 86_400.0);
    stale.record_access(NOW - 3.0 * 86_400.0);
    stats.insert("MEDIUM_TERM".into(), stale);
    MetadataStore::new(tmp.path().join(".memory_meta.json"))
        .save(&stats)
        .unwrap();

    let mut memory = open(tmp.path(), Arc::new(ManualClock::new(NOW)));
    let loaded = memory.smart_load().unwrap();

    // Stale layer scores 0.18 and is dropped; the rest are in
    assert_eq!(loaded.len(), 6);
    assert!(loaded.iter().all(|l| l.layer != Layer::MediumTerm));
    assert!(loaded.iter().all(|l| l.priority >= 0.3));
    assert_eq!(loaded[0].layer, Layer::User);

    // Ties keep enumeration order
    let tied: Vec<Layer> = loaded[1..].iter().map(|l| l.layer).collect();
    assert_eq!(
        tied,
        vec![Layer::LongTerm, Layer::Soul, Layer::Tools, Layer::Agents, Layer::ShortTerm]
    );
    for pair in loaded.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }
}

#[test]
fn nothing_qualifies_after_long_idle_with_low_importance() {
    let tmp = tempfile::tempdir().unwrap();
    write_layer(tmp.path(), Layer::ShortTerm, "yesterday's notes");
    let clock = Arc::new(ManualClock::new(NOW));
    let mut memory = open(tmp.path(), clock.clone());
    memory.access(Layer::ShortTerm).unwrap();

    clock.advance(7.0 * 86_400.0);
    let loaded = memory.smart_load().unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    write_layer(tmp.path(), Layer::LongTerm, "# LONG_TERM");
    let clock = Arc::new(ManualClock::new(NOW));

    {
        let mut memory = open(tmp.path(), clock.clone());
        memory.smart_load().unwrap();
        memory.smart_load().unwrap();
    }

    let memory = open(tmp.path(), clock);
    assert_eq!(memory.stat(Layer::LongTerm).unwrap().access_count, 2);
    assert_eq!(memory.total_accesses(), 2);
}

#[test]
fn corrupt_metadata_fails_fast() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".memory_meta.json");
    std::fs::write(&path, "not json at all").unwrap();

    let result = SmartMemory::open(
        MetadataStore::new(&path),
        Arc::new(DirectoryDocuments::new(tmp.path())),
        Arc::new(ManualClock::new(NOW)),
    );
    assert!(result.unwrap_err().is_corruption());
    // The damaged file is left for inspection
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json at all");
}

#[test]
fn learning_log_scenarios() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(NOW));
    let mut log = LearningLog::open(tmp.path().join(".learning_log.json"), clock.clone()).unwrap();

    // Unknown handle on an empty log
    log.post_hook(99, "fail", false).unwrap();
    assert!(log.hooks().is_empty());

    let id = log.pre_hook("build", Map::new()).unwrap();
    assert_eq!(id, 0);
    log.set_expectation(0, "ok").unwrap();
    log.post_hook(0, "fail", false).unwrap();

    assert_eq!(log.insights().len(), 1);
    assert_eq!(log.insights()[0].expected, json!("ok"));
    assert_eq!(log.insights()[0].actual, json!("fail"));

    let mut memory = open(tmp.path(), clock);
    memory.access(Layer::Soul).unwrap();
    memory.access(Layer::User).unwrap();
    let stats = log.stats(memory.stats());
    assert_eq!(stats.total_hooks, 1);
    assert_eq!(stats.total_insights, 1);
    assert_eq!(stats.total_accesses, 2);
    assert_eq!(stats.version, 1);
}
