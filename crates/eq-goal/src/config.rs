//! Project configuration, read from `.eq/config.toml`.
//!
//! Every field has a default, so a project without a config file works out
//! of the box. Relative paths are resolved against the `.eq/` directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GoalError;

/// Name of the per-project state directory.
pub const STATE_DIR: &str = ".eq";

/// Name of the config file inside [`STATE_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Where goals are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Event log settings
    #[serde(default)]
    pub events: EventsConfig,

    /// Directory relative paths are resolved against. Set by `for_project`.
    #[serde(skip)]
    pub state_dir: PathBuf,
}

/// Goal file location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_goals_file")]
    pub goals_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            goals_file: default_goals_file(),
        }
    }
}

/// Event log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Append a JSONL record for every change
    #[serde(default = "default_events_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: default_events_enabled(),
            log_file: default_log_file(),
        }
    }
}

// Serde default functions
fn default_goals_file() -> PathBuf {
    PathBuf::from("goals.txt")
}

fn default_events_enabled() -> bool {
    true
}

fn default_log_file() -> PathBuf {
    PathBuf::from("events.jsonl")
}

impl QuestConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GoalError> {
        let content = std::fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| GoalError::ConfigError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config if the file exists, otherwise use defaults.
    ///
    /// Unlike a missing file, a malformed one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, GoalError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the configuration for a project rooted at `root`.
    pub fn for_project(root: &Path) -> Result<Self, GoalError> {
        let state_dir = root.join(STATE_DIR);
        let mut config = Self::load_or_default(&state_dir.join(CONFIG_FILE))?;
        config.state_dir = state_dir;
        Ok(config)
    }

    /// Absolute path of the goal file.
    pub fn goals_path(&self) -> PathBuf {
        self.state_dir.join(&self.storage.goals_file)
    }

    /// Absolute path of the event log.
    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join(&self.events.log_file)
    }
}
