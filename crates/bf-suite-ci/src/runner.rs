//! Gate stage execution.

use crate::stage::StageConfig;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Result of a stage execution.
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Stage name.
    pub stage_name: String,

    /// Exit code (0 = success).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether execution succeeded.
    pub success: bool,
}

impl StageResult {
    /// Whether this stage passed (exit code 0).
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }

    /// Last `lines` lines of stderr, for failure messages.
    pub fn stderr_tail(&self, lines: usize) -> String {
        let all: Vec<&str> = self.stderr.lines().collect();
        all[all.len().saturating_sub(lines)..].join("\n")
    }
}

/// Executes gate stages as child processes.
pub struct StageRunner;

impl StageRunner {
    /// Execute a single stage and return the result.
    ///
    /// Errors only when the process cannot be spawned or times out; a
    /// non-zero exit is reported through the result.
    pub async fn execute_stage(config: &StageConfig) -> anyhow::Result<StageResult> {
        let start = Instant::now();

        let Some((exe, args)) = config.command.split_first() else {
            anyhow::bail!("Stage {} has empty command", config.name);
        };

        debug!(stage = %config.name, command = ?config.command, "Spawning stage");

        let mut command = Command::new(exe);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &config.cwd {
            command.current_dir(cwd);
        }
        let child = command.spawn()?;

        let output = if config.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(config.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Stage {} timed out after {} seconds",
                    config.name,
                    config.timeout_secs
                )
            })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let success = output.status.success();

        Ok(StageResult {
            stage_name: config.name.clone(),
            exit_code,
            stdout,
            stderr,
            duration_ms,
            success,
        })
    }
}
