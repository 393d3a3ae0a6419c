//! Per-layer usage statistics and the importance auto-boost.

use layerclaw_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Importance every layer starts with.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Accesses a layer needs before importance starts to climb.
pub const IMPORTANCE_GRACE_ACCESSES: u64 = 5;

/// Importance gained per access past the grace count.
pub const IMPORTANCE_STEP: f64 = 0.05;

/// Layer name to statistics. Only layers accessed at least once appear here.
///
/// Keyed by name rather than [`layerclaw_core::Layer`] so snapshots written
/// with names outside the fixed set still load.
pub type LayerStats = BTreeMap<String, LayerStat>;

/// Usage statistics for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStat {
    /// Times the layer has been used
    pub access_count: u64,

    /// When it was last used (0 if never)
    pub last_access: Timestamp,

    /// When it was first observed
    pub created: Timestamp,

    /// Auto-derived weight in [0, 1]. Older snapshots may lack it.
    #[serde(default = "default_importance")]
    pub importance: f64,
}

fn default_importance() -> f64 {
    DEFAULT_IMPORTANCE
}

impl LayerStat {
    /// A never-accessed stat first observed at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            access_count: 0,
            last_access: 0.0,
            created: now,
            importance: DEFAULT_IMPORTANCE,
        }
    }

    /// Count one use at `now` and re-derive importance.
    pub fn record_access(&mut self, now: Timestamp) {
        self.access_count += 1;
        self.last_access = now;
        if let Some(boosted) = boosted_importance(self.access_count) {
            self.importance = boosted;
        }
    }
}

/// Importance earned by `access_count` uses, or `None` while still in the grace period.
///
/// `min(0.5 + (count - 5) * 0.05, 1.0)` once the count exceeds 5.
pub fn boosted_importance(access_count: u64) -> Option<f64> {
    if access_count <= IMPORTANCE_GRACE_ACCESSES {
        return None;
    }
    let extra = (access_count - IMPORTANCE_GRACE_ACCESSES) as f64;
    Some((DEFAULT_IMPORTANCE + extra * IMPORTANCE_STEP).min(1.0))
}
