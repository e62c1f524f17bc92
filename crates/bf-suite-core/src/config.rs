//! Suite descriptor: distributions, language component, executable naming and
//! gate task commands.
//!
//! Loaded from JSON. [`SuiteConfig::default`] describes the Brainf*ck suite as
//! shipped, so a config file only needs to exist to override something.

use crate::error::{Result, SuiteError};
use crate::launcher::VmArgSplitter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a suite config file.
pub const SUITE_CONFIG_ENV: &str = "BF_SUITE_CONFIG";

/// Top-level suite descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuiteConfig {
    /// Suite name.
    pub name: String,

    /// Exported distributions keyed by id.
    pub distributions: BTreeMap<String, DistributionConfig>,

    /// Language component registered with the platform.
    pub component: LanguageComponent,

    /// Per-OS executable naming.
    pub executable_naming: ExecutableNaming,

    /// Gate task commands.
    pub gate: GateConfig,

    /// CI configuration file locations.
    pub ci: CiConfig,
}

/// A distribution exported by this or an imported suite.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DistributionConfig {
    /// Jar path, relative to the distribution root unless absolute.
    /// Defaults to `<lowercase id>.jar` for jar distributions.
    pub path: Option<PathBuf>,

    /// Distributions this one depends on at runtime.
    pub dist_dependencies: Vec<String>,

    /// Main class, for launcher distributions.
    pub main_class: Option<String>,

    /// Native (resource-only) distribution without a jar.
    pub native: bool,

    /// Test-only distribution.
    pub test_distribution: bool,

    pub description: Option<String>,
}

impl DistributionConfig {
    fn jar(deps: &[&str]) -> Self {
        Self {
            dist_dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Language component as registered with the platform image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageComponent {
    pub name: String,
    pub short_name: String,
    pub dependencies: Vec<String>,
    pub truffle_jars: Vec<String>,
    pub support_distributions: Vec<String>,
    pub launcher: LauncherConfig,
}

/// Launcher shipped with the component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    /// Destination inside the platform home, e.g. `bin/<exe:bf>`.
    pub destination: String,
    pub jar_distributions: Vec<String>,
    pub main_class: String,
    pub build_args: Vec<String>,
    pub language: String,

    /// Prefixes that mark leading standalone arguments as VM flags.
    #[serde(default)]
    pub vm_flags: VmArgSplitter,
}

impl LauncherConfig {
    /// Directory part of the destination (`bin/<exe:bf>` → `bin`).
    pub fn destination_dir(&self) -> &str {
        self.destination
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }

    /// Bare executable name from the destination (`bin/<exe:bf>` → `bf`).
    pub fn executable_base(&self) -> &str {
        let file = self
            .destination
            .rsplit('/')
            .next()
            .unwrap_or(&self.destination);
        file.strip_prefix("<exe:")
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(file)
    }
}

/// Executable suffixes applied per OS family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutableNaming {
    /// Suffix for launcher scripts on Windows.
    pub windows_suffix: String,

    /// Suffix for launchers elsewhere.
    pub unix_suffix: String,
}

impl Default for ExecutableNaming {
    fn default() -> Self {
        Self {
            windows_suffix: ".cmd".to_string(),
            unix_suffix: String::new(),
        }
    }
}

/// Gate task commands, in run order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    pub tasks: Vec<GateTaskConfig>,
}

/// One command-backed gate task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateTaskConfig {
    pub name: String,
    pub tags: Vec<String>,
    pub command: Vec<String>,
    #[serde(default = "default_gate_timeout")]
    pub timeout_secs: u64,
}

fn default_gate_timeout() -> u64 {
    1800
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tasks: vec![
                GateTaskConfig {
                    name: "UnitTests".to_string(),
                    tags: vec!["unittest".to_string()],
                    command: [
                        "mx",
                        "unittest",
                        "--enable-timing",
                        "--very-verbose",
                        "--suite",
                        "brainfck",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                    timeout_secs: default_gate_timeout(),
                },
                GateTaskConfig {
                    name: "Jackpot".to_string(),
                    tags: vec!["jackpot".to_string()],
                    command: ["mx", "jackpot", "--fail-on-warnings"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    timeout_secs: default_gate_timeout(),
                },
            ],
        }
    }
}

/// CI config files compared by `verify-ci`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CiConfig {
    /// This suite's copy.
    pub local: PathBuf,

    /// The upstream (platform) suite's copy.
    pub upstream: PathBuf,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            local: PathBuf::from("common.json"),
            upstream: PathBuf::from("../graal/common.json"),
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let mut distributions = BTreeMap::new();
        distributions.insert(
            "BRAINFCK".to_string(),
            DistributionConfig::jar(&["truffle:TRUFFLE_API"]),
        );
        distributions.insert(
            "BRAINFCK_LAUNCHER".to_string(),
            DistributionConfig {
                main_class: Some(BRAINFCK_LAUNCHER_MAIN.to_string()),
                description: Some("Brainfck launcher using the polyglot API.".to_string()),
                ..DistributionConfig::jar(&["sdk:GRAAL_SDK", "sdk:LAUNCHER_COMMON"])
            },
        );
        distributions.insert(
            "BRAINFCK_TESTS".to_string(),
            DistributionConfig {
                test_distribution: true,
                ..DistributionConfig::jar(&[
                    "BRAINFCK",
                    "truffle:TRUFFLE_API",
                    "truffle:TRUFFLE_TCK",
                    "mx:JUNIT",
                ])
            },
        );
        distributions.insert(
            "BRAINFCK_SUPPORT".to_string(),
            DistributionConfig {
                native: true,
                description: Some("Brainfck support distribution for the GraalVM".to_string()),
                ..DistributionConfig::default()
            },
        );
        for external in [
            "truffle:TRUFFLE_API",
            "truffle:TRUFFLE_TCK",
            "sdk:GRAAL_SDK",
            "sdk:LAUNCHER_COMMON",
            "mx:JUNIT",
        ] {
            distributions.insert(external.to_string(), DistributionConfig::default());
        }

        Self {
            name: "brainfck".to_string(),
            distributions,
            component: LanguageComponent {
                name: "Brainfck".to_string(),
                short_name: "bf".to_string(),
                dependencies: vec!["Truffle".to_string()],
                truffle_jars: vec!["brainfck:BRAINFCK".to_string()],
                support_distributions: vec!["brainfck:BRAINFCK_SUPPORT".to_string()],
                launcher: LauncherConfig {
                    destination: "bin/<exe:bf>".to_string(),
                    jar_distributions: vec!["brainfck:BRAINFCK_LAUNCHER".to_string()],
                    main_class: BRAINFCK_LAUNCHER_MAIN.to_string(),
                    build_args: vec!["--language:bf".to_string()],
                    language: "bf".to_string(),
                    vm_flags: VmArgSplitter::default(),
                },
            },
            executable_naming: ExecutableNaming::default(),
            gate: GateConfig::default(),
            ci: CiConfig::default(),
        }
    }
}

const BRAINFCK_LAUNCHER_MAIN: &str = "com.oracle.truffle.brainfck.launcher.BrainfckLauncher";

impl SuiteConfig {
    /// Load a suite config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SuiteConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), suite = %config.name, "Loaded suite config");
        Ok(config)
    }

    /// Load from `BF_SUITE_CONFIG` if set, otherwise the built-in defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(SUITE_CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Look up a distribution, accepting a `suite:` prefix for this suite.
    pub fn distribution(&self, id: &str) -> Option<&DistributionConfig> {
        self.distributions.get(id).or_else(|| {
            id.strip_prefix(&self.name)
                .and_then(|rest| rest.strip_prefix(':'))
                .and_then(|local| self.distributions.get(local))
        })
    }

    /// Main class of the launcher distribution.
    pub fn launcher_main_class(&self) -> &str {
        &self.component.launcher.main_class
    }

    /// Check that distribution dependencies and launcher references resolve.
    pub fn validate(&self) -> Result<()> {
        for (id, dist) in &self.distributions {
            for dep in &dist.dist_dependencies {
                if self.distribution(dep).is_none() {
                    return Err(SuiteError::Config(format!(
                        "distribution {id} depends on undeclared distribution {dep}"
                    )));
                }
            }
        }
        for jar in &self.component.launcher.jar_distributions {
            if self.distribution(jar).is_none() {
                return Err(SuiteError::Config(format!(
                    "launcher references undeclared distribution {jar}"
                )));
            }
        }
        if self.gate.tasks.iter().any(|t| t.command.is_empty()) {
            return Err(SuiteError::Config(
                "gate task with empty command".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SuiteConfig::default();
        config.validate().expect("default config validates");
        assert_eq!(config.name, "brainfck");
        assert_eq!(
            config.launcher_main_class(),
            "com.oracle.truffle.brainfck.launcher.BrainfckLauncher"
        );
    }

    #[test]
    fn test_distribution_accepts_suite_prefix() {
        let config = SuiteConfig::default();
        assert!(config.distribution("brainfck:BRAINFCK_LAUNCHER").is_some());
        assert!(config.distribution("BRAINFCK_LAUNCHER").is_some());
        assert!(config.distribution("other:BRAINFCK_LAUNCHER").is_none());
    }

    #[test]
    fn test_launcher_executable_base() {
        let config = SuiteConfig::default();
        assert_eq!(config.component.launcher.executable_base(), "bf");
        assert_eq!(config.component.launcher.destination_dir(), "bin");

        let plain = LauncherConfig {
            destination: "bin/brainfck".to_string(),
            ..config.component.launcher.clone()
        };
        assert_eq!(plain.executable_base(), "brainfck");
    }

    #[test]
    fn test_default_gate_tasks() {
        let gate = GateConfig::default();
        let names: Vec<&str> = gate.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["UnitTests", "Jackpot"]);
        assert!(gate.tasks[1].command.contains(&"--fail-on-warnings".to_string()));
    }

    #[test]
    fn test_load_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        std::fs::write(
            &path,
            r#"{ "executable_naming": { "windows_suffix": ".exe" } }"#,
        )
        .unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(
            config.component.launcher.vm_flags,
            crate::launcher::VmArgSplitter::default()
        );
        assert_eq!(config.executable_naming.windows_suffix, ".exe");
        assert_eq!(config.name, "brainfck");
        assert!(config.distribution("BRAINFCK").is_some());
    }

    #[test]
    fn test_load_rejects_dangling_dependency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        std::fs::write(
            &path,
            r#"{ "distributions": { "A": { "dist_dependencies": ["B"] } } }"#,
        )
        .unwrap();

        let err = SuiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, SuiteError::Config(_)));
    }
}
