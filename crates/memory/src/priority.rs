//! Priority scoring — pure functions from layer statistics to a [0, 1] score.
//!
//! ```text
//! score = min(access + recency + importance, 1.0)
//!
//! access     = min(access_count / 10, 1) * 0.3
//! recency    = max(0, 1 - age_secs / 86400) * 0.4
//! importance = importance * 0.3
//! ```
//!
//! Layers with no statistics score exactly [`NEUTRAL_PRIORITY`]. Nothing here
//! does I/O or reads the clock; `now` is always passed in.

use crate::stat::{DEFAULT_IMPORTANCE, LayerStat};
use layerclaw_core::{Layer, Timestamp};
use std::cmp::Ordering;

/// Score of a layer that has never been accessed.
pub const NEUTRAL_PRIORITY: f64 = 0.5;

/// Accesses after which frequency stops adding to the score.
pub const ACCESS_SATURATION: f64 = 10.0;

/// Seconds over which recency decays linearly to zero.
pub const RECENCY_WINDOW_SECS: f64 = 86_400.0;

/// Term weights and the selection cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub access_weight: f64,
    pub recency_weight: f64,
    pub importance_weight: f64,
    /// Minimum score a layer needs to be loaded (inclusive).
    pub load_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            access_weight: 0.3,
            recency_weight: 0.4,
            importance_weight: 0.3,
            load_threshold: 0.3,
        }
    }
}

impl ScoringPolicy {
    /// Frequency term, saturating at [`ACCESS_SATURATION`] accesses.
    pub fn access_term(&self, access_count: u64) -> f64 {
        (access_count as f64 / ACCESS_SATURATION).min(1.0) * self.access_weight
    }

    /// Recency term for a layer last used `age_secs` ago.
    ///
    /// A negative age (last access stamped in the future) counts as "just now".
    pub fn recency_term(&self, age_secs: f64) -> f64 {
        (1.0 - age_secs / RECENCY_WINDOW_SECS).clamp(0.0, 1.0) * self.recency_weight
    }

    pub fn importance_term(&self, importance: f64) -> f64 {
        importance * self.importance_weight
    }

    /// Score one layer at time `now`.
    pub fn score(&self, stat: Option<&LayerStat>, now: Timestamp) -> f64 {
        let Some(stat) = stat else {
            return NEUTRAL_PRIORITY;
        };

        let importance = if stat.importance.is_finite() {
            stat.importance
        } else {
            DEFAULT_IMPORTANCE
        };

        let total = self.access_term(stat.access_count)
            + self.recency_term(now - stat.last_access)
            + self.importance_term(importance);
        total.clamp(0.0, 1.0)
    }

    /// Whether a score clears the load cutoff.
    pub fn qualifies(&self, priority: f64) -> bool {
        priority >= self.load_threshold
    }
}

/// Sort scored layers by descending priority.
///
/// The sort is stable, so equal scores keep the order they came in
/// (enumeration order when fed from [`Layer::ALL`]).
pub fn rank(mut scored: Vec<(Layer, f64)>) -> Vec<(Layer, f64)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}
