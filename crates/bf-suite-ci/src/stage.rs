//! Gate stage definitions and configuration.

use bf_suite_core::GateTaskConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a command-backed gate stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageConfig {
    /// Human-readable stage name.
    pub name: String,

    /// Gate tags that select this stage.
    pub tags: Vec<String>,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Timeout in seconds (0 = none).
    pub timeout_secs: u64,

    /// Working directory (inherited when unset).
    pub cwd: Option<PathBuf>,
}

impl StageConfig {
    /// Create a custom stage configuration.
    pub fn custom(name: String, tags: Vec<String>, command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            name,
            tags,
            command,
            timeout_secs,
            cwd: None,
        }
    }

    /// Run the stage in `cwd`.
    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl From<&GateTaskConfig> for StageConfig {
    fn from(task: &GateTaskConfig) -> Self {
        Self::custom(
            task.name.clone(),
            task.tags.clone(),
            task.command.clone(),
            task.timeout_secs,
        )
    }
}
