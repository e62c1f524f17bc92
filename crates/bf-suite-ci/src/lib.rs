//! Brainf*ck suite CI
//!
//! Command-backed gate tasks for the suite:
//! - Stage configuration built from the suite's gate tasks
//! - Async stage execution with timeouts
//! - Adapter running stages from the blocking gate orchestrator

pub mod action;
pub mod gate;
pub mod runner;
pub mod stage;

// Re-export key types
pub use action::CommandAction;
pub use gate::BrainfckGate;
pub use runner::{StageResult, StageRunner};
pub use stage::StageConfig;
