//! Error taxonomy for suite configuration and launch resolution.

use std::path::PathBuf;

/// Errors produced by the registry, the launcher resolver and config loading.
///
/// Configuration errors (`DuplicateProfile`, `UnknownProfile`) are fatal to the
/// registering call. Launch errors are fatal to that launch attempt only.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("VM profile already registered: {0}")]
    DuplicateProfile(String),

    #[error("unknown VM profile: {0}")]
    UnknownProfile(String),

    #[error("unknown component tag: {0}")]
    UnknownComponentTag(String),

    #[error("platform home not found: {0}")]
    PlatformNotFound(String),

    #[error("unresolved distribution: {0}")]
    UnresolvedDistribution(String),

    #[error("distributions {0:?} resolve to an empty classpath")]
    EmptyClasspath(Vec<String>),

    #[error("java toolchain not found: {0}")]
    ToolchainNotFound(String),

    #[error("CI config {local} differs from upstream {upstream} (local {local_digest}, upstream {upstream_digest})")]
    CiConfigMismatch {
        local: PathBuf,
        upstream: PathBuf,
        local_digest: String,
        upstream_digest: String,
    },

    #[error("invalid suite config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for suite operations.
pub type Result<T> = std::result::Result<T, SuiteError>;
