//! Executes resolved command lines with inherited stdio.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{ExitCode, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

/// Run `argv` to completion and return its exit status.
pub async fn run_command(argv: &[String], cwd: Option<&Path>) -> Result<i32> {
    let (exe, args) = argv.split_first().context("empty command line")?;

    let mut command = Command::new(exe);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    debug!(exe = %exe, args = args.len(), cwd = ?cwd, "Spawning process");
    let status = command
        .status()
        .await
        .with_context(|| format!("Failed to run {exe}"))?;

    match status.code() {
        Some(code) => Ok(code),
        None => {
            warn!(exe = %exe, "Process terminated by signal");
            Ok(1)
        }
    }
}

/// Map a child exit status onto this process's exit code.
pub fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(c) => ExitCode::from(c),
        Err(_) => ExitCode::FAILURE,
    }
}
