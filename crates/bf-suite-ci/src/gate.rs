//! The Brainf*ck gate: command-backed tasks registered with the orchestrator.

use crate::action::CommandAction;
use crate::stage::StageConfig;
use bf_suite_core::{FailurePolicy, GateOrchestrator, GateRunResult, GateTask, SuiteConfig};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::runtime::Handle;
use tracing::info;

/// Builds and runs the suite's gate.
pub struct BrainfckGate;

impl BrainfckGate {
    /// Register one task per configured gate stage, in config order.
    pub fn build(
        config: &SuiteConfig,
        handle: Handle,
        policy: FailurePolicy,
        cwd: Option<&Path>,
    ) -> GateOrchestrator {
        let stages = config.gate.tasks.iter().map(|task| {
            let stage = StageConfig::from(task);
            match cwd {
                Some(dir) => stage.in_dir(dir),
                None => stage,
            }
        });
        Self::from_stages(stages, handle, policy)
    }

    /// Register the given stages as gate tasks.
    pub fn from_stages(
        stages: impl IntoIterator<Item = StageConfig>,
        handle: Handle,
        policy: FailurePolicy,
    ) -> GateOrchestrator {
        let mut gate = GateOrchestrator::new(policy);
        for stage in stages {
            let name = stage.name.clone();
            let tags = stage.tags.clone();
            gate.add_task(GateTask::from_action(
                name,
                tags,
                CommandAction::new(stage, handle.clone()),
            ));
        }
        gate
    }

    /// Run `gate` on a blocking thread so command actions can drive the runtime.
    pub async fn run(
        mut gate: GateOrchestrator,
        requested_tags: BTreeSet<String>,
    ) -> anyhow::Result<GateRunResult> {
        info!(tasks = gate.tasks().len(), "Dispatching gate to blocking thread");
        let result = tokio::task::spawn_blocking(move || gate.run_gate(&requested_tags)).await?;
        Ok(result)
    }
}
