//! Learning log — expectation/outcome hooks around actions, and the insights
//! recorded when an outcome surprises.
//!
//! Lifecycle of a hook, addressed by its index in the log:
//!
//! ```text
//! pre_hook ──► [created] ──set_expectation──► [expecting] ──post_hook──► [completed]
//!                  └──────────────────post_hook───────────────────────────────┘
//! ```
//!
//! Handles out of range are ignored rather than reported: this is best-effort
//! telemetry and must never fail the action it wraps. A second `post_hook` on
//! the same handle overwrites the outcome (last write wins); `set_expectation`
//! on a completed hook is ignored.

use crate::stat::LayerStats;
use crate::store::{read_snapshot, write_snapshot};
use layerclaw_core::error::MemoryError;
use layerclaw_core::{Clock, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// On-disk format version of the learning log.
pub const LOG_FORMAT_VERSION: u32 = 1;

/// Handle of a hook: its position in the log.
pub type HookId = usize;

/// Hook kind. Only pre-action hooks exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Pre,
}

/// An expectation/outcome record for one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningHook {
    #[serde(rename = "type")]
    pub kind: HookKind,

    /// Caller-supplied action label
    pub action: String,

    /// Opaque caller payload
    #[serde(default)]
    pub context: Map<String, Value>,

    pub timestamp: Timestamp,

    #[serde(default)]
    pub expected_outcome: Option<Value>,

    #[serde(default)]
    pub actual_outcome: Option<Value>,

    /// Set when the hook completes
    #[serde(default)]
    pub success: Option<bool>,
}

impl LearningHook {
    pub fn is_complete(&self) -> bool {
        self.success.is_some()
    }
}

/// Kind of derived insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// The actual outcome differed from the stated expectation.
    ExpectationDelta,
}

/// A recorded surprise. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub action: String,
    pub expected: Value,
    pub actual: Value,
    pub timestamp: Timestamp,
}

/// Root of the learning log snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningLogData {
    #[serde(default)]
    pub hooks: Vec<LearningHook>,

    #[serde(default)]
    pub insights: Vec<Insight>,

    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    LOG_FORMAT_VERSION
}

impl Default for LearningLogData {
    fn default() -> Self {
        Self {
            hooks: Vec::new(),
            insights: Vec::new(),
            version: LOG_FORMAT_VERSION,
        }
    }
}

/// Aggregate counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub total_hooks: usize,
    pub total_insights: usize,
    /// Sum of every layer's access count
    pub total_accesses: u64,
    pub version: u32,
}

/// The learning log, persisted as one JSON snapshot after every mutation.
pub struct LearningLog {
    path: PathBuf,
    data: LearningLogData,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LearningLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningLog")
            .field("path", &self.path)
            .field("hooks", &self.data.hooks.len())
            .field("insights", &self.data.insights.len())
            .finish()
    }
}

impl LearningLog {
    /// Open the log at `path`. A missing file starts an empty log; a corrupt one is an error.
    pub fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, MemoryError> {
        let path = path.into();
        let data = read_snapshot::<LearningLogData>(&path)?.unwrap_or_default();
        debug!(
            path = %path.display(),
            hooks = data.hooks.len(),
            insights = data.insights.len(),
            "Learning log loaded"
        );
        Ok(Self { path, data, clock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hooks(&self) -> &[LearningHook] {
        &self.data.hooks
    }

    pub fn hook(&self, id: HookId) -> Option<&LearningHook> {
        self.data.hooks.get(id)
    }

    pub fn insights(&self) -> &[Insight] {
        &self.data.insights
    }

    /// Record the start of an action. Returns the hook's handle.
    pub fn pre_hook(
        &mut self,
        action: impl Into<String>,
        context: Map<String, Value>,
    ) -> Result<HookId, MemoryError> {
        let hook = LearningHook {
            kind: HookKind::Pre,
            action: action.into(),
            context,
            timestamp: self.clock.now(),
            expected_outcome: None,
            actual_outcome: None,
            success: None,
        };
        self.data.hooks.push(hook);
        let id = self.data.hooks.len() - 1;

        if let Err(e) = self.flush() {
            self.data.hooks.pop();
            return Err(e);
        }
        debug!(hook = id, "Pre-hook recorded");
        Ok(id)
    }

    /// State what the action is expected to produce.
    pub fn set_expectation(&mut self, id: HookId, expected: impl Into<Value>) -> Result<(), MemoryError> {
        let Some(hook) = self.data.hooks.get_mut(id) else {
            debug!(hook = id, "Ignoring expectation for unknown hook");
            return Ok(());
        };
        if hook.is_complete() {
            debug!(hook = id, "Ignoring expectation for completed hook");
            return Ok(());
        }
        let previous = hook.expected_outcome.replace(expected.into());

        if let Err(e) = self.flush() {
            self.data.hooks[id].expected_outcome = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Record the outcome of an action.
    ///
    /// Appends one insight when an expectation was set and the outcome differs.
    pub fn post_hook(
        &mut self,
        id: HookId,
        actual: impl Into<Value>,
        success: bool,
    ) -> Result<(), MemoryError> {
        let now = self.clock.now();
        let Some(hook) = self.data.hooks.get_mut(id) else {
            debug!(hook = id, "Ignoring outcome for unknown hook");
            return Ok(());
        };
        let actual = actual.into();
        let previous = (
            hook.actual_outcome.replace(actual.clone()),
            hook.success.replace(success),
        );
        let insight_count = self.data.insights.len();

        if let Some(expected) = hook.expected_outcome.as_ref().filter(|e| **e != actual) {
            info!(hook = id, action = %hook.action, "Outcome differed from expectation");
            let insight = Insight {
                kind: InsightKind::ExpectationDelta,
                action: hook.action.clone(),
                expected: expected.clone(),
                actual,
                timestamp: now,
            };
            self.data.insights.push(insight);
        }

        if let Err(e) = self.flush() {
            let hook = &mut self.data.hooks[id];
            (hook.actual_outcome, hook.success) = previous;
            self.data.insights.truncate(insight_count);
            return Err(e);
        }
        Ok(())
    }

    /// Aggregate counters, with access totals taken from `layers`.
    pub fn stats(&self, layers: &LayerStats) -> LearningStats {
        LearningStats {
            total_hooks: self.data.hooks.len(),
            total_insights: self.data.insights.len(),
            total_accesses: layers.values().map(|s| s.access_count).sum(),
            version: self.data.version,
        }
    }

    fn flush(&self) -> Result<(), MemoryError> {
        write_snapshot(&self.path, &self.data)
    }
}
