//! Gate task orchestration.
//!
//! A gate is a fixed sequence of named, tagged tasks. Each run filters the
//! tasks by the requested tags, executes the applicable ones in registration
//! order and records a per-task outcome. Action failures are recorded, not
//! propagated, so one run reports every violation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Tags used by the Brainf*ck gate.
pub struct BrainfckGateTags;

impl BrainfckGateTags {
    pub const UNITTEST: &'static str = "unittest";
    pub const JACKPOT: &'static str = "jackpot";
}

/// Work performed by a gate task.
///
/// Implemented for any `FnMut() -> anyhow::Result<()>` closure.
pub trait GateAction: Send {
    fn run(&mut self) -> anyhow::Result<()>;
}

impl<F> GateAction for F
where
    F: FnMut() -> anyhow::Result<()> + Send,
{
    fn run(&mut self) -> anyhow::Result<()> {
        self()
    }
}

/// A named gate task with the tags it applies to.
pub struct GateTask {
    name: String,
    tags: BTreeSet<String>,
    action: Box<dyn GateAction>,
}

impl std::fmt::Debug for GateTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateTask")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl GateTask {
    /// Task backed by a closure.
    pub fn new<I, S, F>(name: impl Into<String>, tags: I, action: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        Self::from_action(name, tags, action)
    }

    /// Task backed by any [`GateAction`].
    pub fn from_action<I, S>(
        name: impl Into<String>,
        tags: I,
        action: impl GateAction + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            action: Box::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the task runs under `filter`. An empty filter selects every task.
    pub fn applies_to(&self, filter: &BTreeSet<String>) -> bool {
        filter.is_empty() || !self.tags.is_disjoint(filter)
    }

    /// Enter the task under `filter`. Returns `None` when the task is skipped.
    pub fn enter(&mut self, filter: &BTreeSet<String>) -> Option<TaskRun<'_>> {
        if !self.applies_to(filter) {
            return None;
        }
        Some(TaskRun {
            task: self,
            started: Instant::now(),
            outcome: None,
        })
    }
}

/// Outcome of a single task in a gate run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The filter did not select the task.
    Skipped,

    /// The action completed without error.
    Passed,

    /// The action returned an error.
    Failed { error: String },

    /// The run stopped before reaching the task.
    NotRun,
}

/// An entered task. Evaluate it, then exit to obtain its report.
pub struct TaskRun<'a> {
    task: &'a mut GateTask,
    started: Instant,
    outcome: Option<TaskOutcome>,
}

impl TaskRun<'_> {
    /// Run the task's action once and capture its outcome.
    pub fn evaluate(&mut self) -> &TaskOutcome {
        let task = &mut *self.task;
        self.outcome.get_or_insert_with(|| {
            info!(task = %task.name, "Running gate task");
            let result = match panic::catch_unwind(AssertUnwindSafe(|| task.action.run())) {
                Ok(result) => result.map_err(|e| format!("{e:#}")),
                Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
            };
            match result {
                Ok(()) => TaskOutcome::Passed,
                Err(error) => {
                    warn!(task = %task.name, error = %error, "Gate task failed");
                    TaskOutcome::Failed { error }
                }
            }
        })
    }

    /// Leave the task. An entered task that was never evaluated is `NotRun`.
    pub fn exit(self) -> TaskReport {
        TaskReport {
            name: self.task.name.clone(),
            outcome: self.outcome.unwrap_or(TaskOutcome::NotRun),
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Recorded result for one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    pub outcome: TaskOutcome,
    pub duration_ms: u64,
}

impl TaskReport {
    fn without_run(name: &str, outcome: TaskOutcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            duration_ms: 0,
        }
    }
}

/// What to do after a task fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep running the remaining tasks and fail at the end.
    #[default]
    ContinueOnFailure,

    /// Mark the remaining tasks `NotRun` after the first failure.
    StopOnFirstFailure,
}

/// Aggregate gate status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Passed,
    Failed,
}

/// Result of a complete gate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRunResult {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub status: GateStatus,
    pub tasks: Vec<TaskReport>,
    pub duration_ms: u64,
}

impl GateRunResult {
    pub fn passed(&self) -> bool {
        self.status == GateStatus::Passed
    }

    pub fn outcome_of(&self, name: &str) -> Option<&TaskOutcome> {
        self.tasks.iter().find(|t| t.name == name).map(|t| &t.outcome)
    }

    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.tasks.iter().filter(|t| pred(&t.outcome)).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Passed))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped))
    }

    /// `(task, error)` pairs for every failed task.
    pub fn violations(&self) -> Vec<(&str, &str)> {
        self.tasks
            .iter()
            .filter_map(|t| match &t.outcome {
                TaskOutcome::Failed { error } => Some((t.name.as_str(), error.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Runs registered gate tasks against a tag filter.
#[derive(Debug, Default)]
pub struct GateOrchestrator {
    tasks: Vec<GateTask>,
    policy: FailurePolicy,
}

impl GateOrchestrator {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            tasks: Vec::new(),
            policy,
        }
    }

    pub fn add_task(&mut self, task: GateTask) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(&self) -> &[GateTask] {
        &self.tasks
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every task selected by `requested_tags`.
    pub fn run_gate(&mut self, requested_tags: &BTreeSet<String>) -> GateRunResult {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();
        info!(run_id = %run_id, tags = ?requested_tags, tasks = self.tasks.len(), "Starting gate");

        let mut reports = Vec::with_capacity(self.tasks.len());
        let mut halted = false;

        for task in &mut self.tasks {
            if halted {
                reports.push(TaskReport::without_run(&task.name, TaskOutcome::NotRun));
                continue;
            }

            let name = task.name.clone();
            let Some(mut run) = task.enter(requested_tags) else {
                info!(task = %name, "Skipping gate task");
                reports.push(TaskReport::without_run(&name, TaskOutcome::Skipped));
                continue;
            };

            run.evaluate();
            let report = run.exit();
            if matches!(report.outcome, TaskOutcome::Failed { .. })
                && self.policy == FailurePolicy::StopOnFirstFailure
            {
                halted = true;
            }
            reports.push(report);
        }

        let any_failed = reports
            .iter()
            .any(|r| matches!(r.outcome, TaskOutcome::Failed { .. }));
        let status = if any_failed {
            GateStatus::Failed
        } else {
            GateStatus::Passed
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(run_id = %run_id, status = ?status, duration_ms, "Gate finished");

        GateRunResult {
            run_id,
            started_at,
            status,
            tasks: reports,
            duration_ms,
        }
    }
}

/// Parse a comma-separated gate tag filter. An empty string selects everything.
pub fn parse_gate_tags(s: &str) -> BTreeSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
