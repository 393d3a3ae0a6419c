//! Configuration loading, validation, and management for LayerClaw.
//!
//! Loads configuration from `~/.layerclaw/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.layerclaw/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where layer documents and snapshots live
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Scoring weights and the load cutoff
    #[serde(default)]
    pub priority: PriorityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory directory. Defaults to `~/.layerclaw/workspace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Layer statistics snapshot, relative to `dir`
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Learning log snapshot, relative to `dir`
    #[serde(default = "default_learning_file")]
    pub learning_file: String,
}

fn default_metadata_file() -> String {
    ".memory_meta.json".into()
}
fn default_learning_file() -> String {
    ".learning_log.json".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dir: None,
            metadata_file: default_metadata_file(),
            learning_file: default_learning_file(),
        }
    }
}

impl MemoryConfig {
    /// The effective memory directory.
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(AppConfig::workspace_dir)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir().join(&self.metadata_file)
    }

    pub fn learning_path(&self) -> PathBuf {
        self.dir().join(&self.learning_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityConfig {
    #[serde(default = "default_access_weight")]
    pub access_weight: f64,

    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    #[serde(default = "default_importance_weight")]
    pub importance_weight: f64,

    /// Layers scoring below this are not loaded
    #[serde(default = "default_load_threshold")]
    pub load_threshold: f64,
}

fn default_access_weight() -> f64 {
    0.3
}
fn default_recency_weight() -> f64 {
    0.4
}
fn default_importance_weight() -> f64 {
    0.3
}
fn default_load_threshold() -> f64 {
    0.3
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            access_weight: default_access_weight(),
            recency_weight: default_recency_weight(),
            importance_weight: default_importance_weight(),
            load_threshold: default_load_threshold(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.layerclaw/config.toml).
    ///
    /// `LAYERCLAW_MEMORY_DIR` overrides the memory directory.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        if let Ok(dir) = std::env::var("LAYERCLAW_MEMORY_DIR") {
            if !dir.trim().is_empty() {
                config.memory.dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".layerclaw")
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Get the default memory directory path.
    pub fn workspace_dir() -> PathBuf {
        Self::config_dir().join("workspace")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.priority;
        for (name, weight) in [
            ("access_weight", p.access_weight),
            ("recency_weight", p.recency_weight),
            ("importance_weight", p.importance_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "priority.{name} must be a non-negative number"
                )));
            }
        }

        let sum = p.access_weight + p.recency_weight + p.importance_weight;
        if sum <= 0.0 || sum > 1.0 + f64::EPSILON {
            return Err(ConfigError::ValidationError(
                "priority weights must sum to a value in (0, 1]".into(),
            ));
        }

        if !(0.0..=1.0).contains(&p.load_threshold) {
            return Err(ConfigError::ValidationError(
                "priority.load_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.memory.metadata_file.trim().is_empty() || self.memory.learning_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "memory.metadata_file and memory.learning_file must not be empty".into(),
            ));
        }

        if self.memory.metadata_file == self.memory.learning_file {
            return Err(ConfigError::ValidationError(
                "memory.metadata_file and memory.learning_file must differ".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.priority.load_threshold, 0.3);
        assert_eq!(config.memory.metadata_file, ".memory_meta.json");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.priority.recency_weight, config.priority.recency_weight);
        assert_eq!(parsed.memory.learning_file, config.memory.learning_file);
    }

    #[test]
    fn negative_weight_rejected() {
        let config = AppConfig {
            priority: PriorityConfig {
                access_weight: -0.1,
                ..PriorityConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn weights_over_one_rejected() {
        let config = AppConfig {
            priority: PriorityConfig {
                recency_weight: 0.9,
                ..PriorityConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let config = AppConfig {
            priority: PriorityConfig {
                load_threshold: 1.5,
                ..PriorityConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_snapshot_file_rejected() {
        let mut config = AppConfig::default();
        config.memory.learning_file = config.memory.metadata_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().priority.access_weight, 0.3);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[memory]\ndir = \"/srv/lisa\"\n\n[priority]\nload_threshold = 0.5\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.memory.dir(), PathBuf::from("/srv/lisa"));
        assert_eq!(
            config.memory.metadata_path(),
            PathBuf::from("/srv/lisa/.memory_meta.json")
        );
        assert_eq!(config.priority.load_threshold, 0.5);
        assert_eq!(config.priority.recency_weight, 0.4);
    }

    #[test]
    fn unparseable_config_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[priority\nload_threshold = ").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("load_threshold"));
        assert!(toml_str.contains(".memory_meta.json"));
    }
}
