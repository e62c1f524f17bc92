//! Bridging command stages into the blocking gate orchestrator.

use crate::runner::StageRunner;
use crate::stage::StageConfig;
use bf_suite_core::GateAction;
use tokio::runtime::Handle;

/// Lines of stderr carried into a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// A gate action that runs a [`StageConfig`] on a tokio runtime.
///
/// The gate must run on a thread outside the runtime (e.g. inside
/// `spawn_blocking`), since the action blocks on the runtime handle.
pub struct CommandAction {
    config: StageConfig,
    handle: Handle,
}

impl CommandAction {
    pub fn new(config: StageConfig, handle: Handle) -> Self {
        Self { config, handle }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }
}

impl GateAction for CommandAction {
    fn run(&mut self) -> anyhow::Result<()> {
        let result = self
            .handle
            .block_on(StageRunner::execute_stage(&self.config))?;
        if result.passed() {
            return Ok(());
        }

        let tail = result.stderr_tail(STDERR_TAIL_LINES);
        if tail.is_empty() {
            anyhow::bail!("{} exited with code {}", result.stage_name, result.exit_code)
        }
        anyhow::bail!(
            "{} exited with code {}:\n{}",
            result.stage_name,
            result.exit_code,
            tail
        )
    }
}
