//! Smart memory engine — records layer accesses and loads layers by priority.
//!
//! Statistics are held in memory and flushed to the [`MetadataStore`] on every
//! mutation. Updates are visible to later calls on the same engine right away;
//! another process only sees them after it reloads the snapshot.

use crate::priority::{self, ScoringPolicy};
use crate::stat::{LayerStat, LayerStats};
use crate::store::MetadataStore;
use layerclaw_core::error::MemoryError;
use layerclaw_core::{Clock, Layer, LayerDocuments};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// One layer returned by a load, with the score it was selected at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedLayer {
    pub layer: Layer,
    pub priority: f64,
    pub content: String,
}

/// The scoring-and-selection engine over the fixed layer set.
pub struct SmartMemory {
    store: MetadataStore,
    stats: LayerStats,
    documents: Arc<dyn LayerDocuments>,
    clock: Arc<dyn Clock>,
    policy: ScoringPolicy,
}

impl std::fmt::Debug for SmartMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartMemory")
            .field("store", &self.store.path())
            .field("layers_tracked", &self.stats.len())
            .field("documents", &self.documents.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SmartMemory {
    /// Open the engine, reading whatever statistics the store already holds.
    ///
    /// A missing snapshot starts empty; a corrupt one is an error.
    pub fn open(
        store: MetadataStore,
        documents: Arc<dyn LayerDocuments>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, MemoryError> {
        let stats = store.load()?;
        Ok(Self {
            store,
            stats,
            documents,
            clock,
            policy: ScoringPolicy::default(),
        })
    }

    /// Replace the default scoring policy.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// All recorded statistics.
    pub fn stats(&self) -> &LayerStats {
        &self.stats
    }

    /// Statistics for one layer, if it has ever been accessed.
    pub fn stat(&self, name: impl AsRef<str>) -> Option<&LayerStat> {
        self.stats.get(name.as_ref())
    }

    /// Sum of every layer's access count.
    pub fn total_accesses(&self) -> u64 {
        self.stats.values().map(|s| s.access_count).sum()
    }

    /// Record one use of a layer and persist the whole mapping.
    ///
    /// Names outside the fixed layer set are accepted. If the save fails the
    /// in-memory statistics are rolled back and the error is returned.
    pub fn access(&mut self, name: impl AsRef<str>) -> Result<(), MemoryError> {
        let name = name.as_ref();
        let now = self.clock.now();
        let previous = self.stats.get(name).cloned();

        let stat = self
            .stats
            .entry(name.to_string())
            .or_insert_with(|| LayerStat::new(now));
        stat.record_access(now);
        let (count, importance) = (stat.access_count, stat.importance);

        if let Err(e) = self.store.save(&self.stats) {
            match previous {
                Some(prev) => self.stats.insert(name.to_string(), prev),
                None => self.stats.remove(name),
            };
            return Err(e);
        }

        debug!(layer = name, count, importance, "Layer accessed");
        Ok(())
    }

    /// Current score of a layer in [0, 1]. Never-accessed layers score 0.5.
    pub fn priority(&self, name: impl AsRef<str>) -> f64 {
        self.policy
            .score(self.stats.get(name.as_ref()), self.clock.now())
    }

    /// Score of every fixed layer, in enumeration order.
    pub fn layer_priorities(&self) -> Vec<(Layer, f64)> {
        let now = self.clock.now();
        Layer::ALL
            .into_iter()
            .map(|layer| (layer, self.policy.score(self.stats.get(layer.as_str()), now)))
            .collect()
    }

    /// Every fixed layer by descending score, ties in enumeration order.
    pub fn ranked_priorities(&self) -> Vec<(Layer, f64)> {
        priority::rank(self.layer_priorities())
    }

    /// Load every layer that clears the threshold and has a document,
    /// highest score first.
    ///
    /// Each loaded layer counts as an access. The reported priorities are the
    /// scores from before this load's own accesses.
    pub fn smart_load(&mut self) -> Result<Vec<LoadedLayer>, MemoryError> {
        let ranked = self.ranked_priorities();
        let mut loaded = Vec::new();

        for (layer, priority) in ranked {
            if !self.policy.qualifies(priority) {
                debug!(layer = %layer, priority, "Layer below load threshold");
                continue;
            }
            let Some(content) = self.documents.fetch(layer)? else {
                continue;
            };
            self.access(layer)?;
            loaded.push(LoadedLayer {
                layer,
                priority,
                content,
            });
        }

        info!(loaded = loaded.len(), "Smart load complete");
        Ok(loaded)
    }

    /// Every layer that has a document, in enumeration order, without
    /// recording any access.
    pub fn load_all(&self) -> Result<Vec<LoadedLayer>, MemoryError> {
        let now = self.clock.now();
        let mut loaded = Vec::new();
        for layer in Layer::ALL {
            if let Some(content) = self.documents.fetch(layer)? {
                loaded.push(LoadedLayer {
                    layer,
                    priority: self.policy.score(self.stats.get(layer.as_str()), now),
                    content,
                });
            }
        }
        Ok(loaded)
    }

    /// True until the long-term memory document has been written.
    pub fn is_first_wake(&self) -> bool {
        !self.documents.exists(Layer::LongTerm)
    }
}
