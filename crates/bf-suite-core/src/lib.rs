//! Brainf*ck suite core
//!
//! Build and integration logic for assembling the Brainf*ck language
//! component into the polyglot platform:
//! - VM configuration registry (build profiles as component tag sets)
//! - Gate task orchestration with tag filtering
//! - Launcher resolution for embedded and standalone runs
//! - CI configuration verification

pub mod component;
pub mod config;
pub mod error;
pub mod gate;
pub mod launcher;
pub mod telemetry;
pub mod verify_ci;
pub mod vm_config;

pub use component::{parse_tag_list, ComponentTag};
pub use config::{
    DistributionConfig, GateTaskConfig, LanguageComponent, LauncherConfig, SuiteConfig,
    SUITE_CONFIG_ENV,
};
pub use error::{Result, SuiteError};
pub use gate::{
    parse_gate_tags, BrainfckGateTags, FailurePolicy, GateAction, GateOrchestrator,
    GateRunResult, GateStatus, GateTask, TaskOutcome, TaskReport, TaskRun,
};
pub use launcher::{
    standalone_artifacts, CommandKind, CommandLine, DistributionResolver, EnvPlatformLocator,
    FixedPlatformLocator, LaunchMode, LaunchSpec, LauncherResolver, OsFamily, PlatformLocator,
    SplitArgs, SuiteDistributionResolver, Toolchain, VmArgSplitter, DOUBLE_DASH,
};
pub use telemetry::init_tracing;
pub use verify_ci::{verify_ci, CiVerification};
pub use vm_config::{VmConfigRegistry, VmProfile};
