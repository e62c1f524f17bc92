//! Launcher resolution.
//!
//! Builds the process invocation for the Brainf*ck launcher, either embedded
//! in an assembled platform image or standalone from distribution jars.
//! Resolution never spawns a process: the returned [`CommandLine`] is handed
//! to a process executor.

pub mod args;
pub mod distribution;
pub mod platform;

pub use args::{SplitArgs, VmArgSplitter, DOUBLE_DASH};
pub use distribution::{DistributionResolver, SuiteDistributionResolver, DIST_ROOT_ENV};
pub use platform::{
    EnvPlatformLocator, FixedPlatformLocator, OsFamily, PlatformLocator, Toolchain,
    JAVA_HOME_ENV, PLATFORM_HOME_ENV,
};

use crate::config::{ExecutableNaming, LauncherConfig, SuiteConfig};
use crate::error::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// How the launcher is invoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// From an assembled platform installation.
    Embedded,

    /// From loose distribution jars on an explicit classpath.
    Standalone,
}

/// Inputs for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSpec {
    Embedded {
        platform_home: PathBuf,
        user_args: Vec<String>,
    },
    Standalone {
        artifact_ids: Vec<String>,
        main_class: String,
        user_args: Vec<String>,
    },
}

impl LaunchSpec {
    pub fn mode(&self) -> LaunchMode {
        match self {
            LaunchSpec::Embedded { .. } => LaunchMode::Embedded,
            LaunchSpec::Standalone { .. } => LaunchMode::Standalone,
        }
    }
}

/// Which program runs the command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// `args[0]` is the executable.
    Native,

    /// `args` are passed to the toolchain's `java`.
    Java,
}

/// A fully resolved command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandLine {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Full argv, prefixing `java` for Java commands.
    pub fn argv(&self, toolchain: Option<&Toolchain>, os: OsFamily) -> Result<Vec<String>> {
        match self.kind {
            CommandKind::Native => Ok(self.args.clone()),
            CommandKind::Java => {
                let toolchain = toolchain.ok_or_else(|| {
                    SuiteError::ToolchainNotFound("standalone launch needs a JDK".to_string())
                })?;
                let mut argv = Vec::with_capacity(self.args.len() + 1);
                argv.push(toolchain.java_executable(os).to_string_lossy().into_owned());
                argv.extend(self.args.iter().cloned());
                Ok(argv)
            }
        }
    }
}

/// Resolves launch specs against the suite's launcher configuration.
#[derive(Debug, Clone)]
pub struct LauncherResolver {
    launcher: LauncherConfig,
    naming: ExecutableNaming,
    os: OsFamily,
}

impl LauncherResolver {
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            launcher: config.component.launcher.clone(),
            naming: config.executable_naming.clone(),
            os: OsFamily::current(),
        }
    }

    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    /// Launcher executable inside the platform home.
    pub fn executable_name(&self) -> String {
        self.os
            .launcher_name(self.launcher.executable_base(), &self.naming)
    }

    /// `[<home>/bin/<exe>] ++ user_args`.
    pub fn resolve_embedded(
        &self,
        locator: &dyn PlatformLocator,
        user_args: &[String],
    ) -> Result<CommandLine> {
        let home = locator.platform_home()?;
        let mut exe = home;
        let dir = self.launcher.destination_dir();
        if !dir.is_empty() {
            exe.push(dir);
        }
        exe.push(self.executable_name());

        debug!(exe = %exe.display(), args = user_args.len(), "Resolved embedded launcher");

        let mut args = Vec::with_capacity(user_args.len() + 1);
        args.push(exe.to_string_lossy().into_owned());
        args.extend(user_args.iter().cloned());
        Ok(CommandLine {
            kind: CommandKind::Native,
            args,
        })
    }

    /// `vm_flags ++ ["-cp", classpath] ++ [main_class] ++ program_args`.
    pub fn resolve_standalone(
        &self,
        resolver: &dyn DistributionResolver,
        artifact_ids: &[String],
        main_class: &str,
        raw_args: &[String],
    ) -> Result<CommandLine> {
        let SplitArgs {
            vm_args,
            program_args,
        } = self.launcher.vm_flags.split(raw_args);

        let classpath = resolver.classpath(artifact_ids)?;
        if classpath.is_empty() {
            return Err(SuiteError::EmptyClasspath(artifact_ids.to_vec()));
        }
        let joined = classpath
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(self.os.path_separator());

        debug!(
            main_class,
            vm_args = vm_args.len(),
            classpath_entries = classpath.len(),
            "Resolved standalone launcher"
        );

        let mut args = vm_args;
        args.push("-cp".to_string());
        args.push(joined);
        args.push(main_class.to_string());
        args.extend(program_args);
        Ok(CommandLine {
            kind: CommandKind::Java,
            args,
        })
    }

    /// Resolve a complete launch spec.
    pub fn resolve(
        &self,
        spec: &LaunchSpec,
        resolver: &dyn DistributionResolver,
    ) -> Result<CommandLine> {
        match spec {
            LaunchSpec::Embedded {
                platform_home,
                user_args,
            } => self.resolve_embedded(&FixedPlatformLocator::new(platform_home), user_args),
            LaunchSpec::Standalone {
                artifact_ids,
                main_class,
                user_args,
            } => self.resolve_standalone(resolver, artifact_ids, main_class, user_args),
        }
    }
}

/// Distributions put on the classpath for a standalone launch.
pub fn standalone_artifacts(config: &SuiteConfig) -> Vec<String> {
    let mut ids: Vec<String> = config
        .component
        .truffle_jars
        .iter()
        .chain(config.component.launcher.jar_distributions.iter())
        .cloned()
        .collect();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct StubResolver(Vec<PathBuf>);

    impl DistributionResolver for StubResolver {
        fn classpath(&self, ids: &[String]) -> Result<Vec<PathBuf>> {
            if let Some(bad) = ids.iter().find(|id| id.as_str() == "MISSING") {
                return Err(SuiteError::UnresolvedDistribution(bad.clone()));
            }
            Ok(self.0.clone())
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn resolver() -> LauncherResolver {
        LauncherResolver::new(&SuiteConfig::default()).with_os(OsFamily::Unix)
    }

    #[test]
    fn test_embedded_command() {
        let home = tempfile::tempdir().unwrap();
        let cmd = resolver()
            .resolve_embedded(&FixedPlatformLocator::new(home.path()), &args(&["prog.bf"]))
            .unwrap();
        assert_eq!(cmd.kind, CommandKind::Native);
        assert_eq!(cmd.args.len(), 2);
        assert_eq!(Path::new(&cmd.args[0]), home.path().join("bin").join("bf"));
        assert_eq!(cmd.args[1], "prog.bf");
    }

    #[test]
    fn test_embedded_windows_suffix() {
        let home = tempfile::tempdir().unwrap();
        let cmd = resolver()
            .with_os(OsFamily::Windows)
            .resolve_embedded(&FixedPlatformLocator::new(home.path()), &[])
            .unwrap();
        assert!(cmd.args[0].ends_with("bf.cmd"));
        assert_eq!(cmd.args.len(), 1);
    }

    #[test]
    fn test_embedded_missing_platform() {
        let home = tempfile::tempdir().unwrap();
        let err = resolver()
            .resolve_embedded(
                &FixedPlatformLocator::new(home.path().join("missing")),
                &args(&["x"]),
            )
            .unwrap_err();
        assert!(matches!(err, SuiteError::PlatformNotFound(_)));
    }

    #[test]
    fn test_standalone_command_layout() {
        let stub = StubResolver(vec![PathBuf::from("/d/a.jar"), PathBuf::from("/d/b.jar")]);
        let cmd = resolver()
            .resolve_standalone(
                &stub,
                &args(&["BRAINFCK", "BRAINFCK_LAUNCHER"]),
                "com.example.Launcher",
                &args(&["-Xss2m", "--", "run", "prog.bf"]),
            )
            .unwrap();
        assert_eq!(cmd.kind, CommandKind::Java);
        assert_eq!(
            cmd.args,
            args(&[
                "-Xss2m",
                "-cp",
                "/d/a.jar:/d/b.jar",
                "com.example.Launcher",
                "run",
                "prog.bf"
            ])
        );
    }

    #[test]
    fn test_standalone_uses_configured_vm_flag_prefixes() {
        let mut config = SuiteConfig::default();
        config.component.launcher.vm_flags = VmArgSplitter {
            recognized_prefixes: vec!["--vm.".to_string()],
        };
        let stub = StubResolver(vec![PathBuf::from("/d/a.jar")]);
        let cmd = LauncherResolver::new(&config)
            .with_os(OsFamily::Unix)
            .resolve_standalone(
                &stub,
                &args(&["X"]),
                "Main",
                &args(&["--vm.Xss2m", "-Dx=1", "prog.bf"]),
            )
            .unwrap();
        assert_eq!(
            cmd.args,
            args(&["--vm.Xss2m", "-cp", "/d/a.jar", "Main", "-Dx=1", "prog.bf"])
        );
    }

    #[test]
    fn test_standalone_empty_classpath() {
        let err = resolver()
            .resolve_standalone(&StubResolver(vec![]), &args(&["X"]), "Main", &[])
            .unwrap_err();
        assert!(matches!(err, SuiteError::EmptyClasspath(_)));
    }

    #[test]
    fn test_standalone_unresolved() {
        let stub = StubResolver(vec![PathBuf::from("/d/a.jar")]);
        let err = resolver()
            .resolve_standalone(&stub, &args(&["MISSING"]), "Main", &[])
            .unwrap_err();
        assert!(matches!(err, SuiteError::UnresolvedDistribution(_)));
    }

    #[test]
    fn test_argv_prefixes_java() {
        let cmd = CommandLine {
            kind: CommandKind::Java,
            args: args(&["-cp", "a.jar", "Main"]),
        };
        let argv = cmd
            .argv(Some(&Toolchain::new("/jdk")), OsFamily::Unix)
            .unwrap();
        assert_eq!(argv[0], "/jdk/bin/java");
        assert_eq!(&argv[1..], &args(&["-cp", "a.jar", "Main"])[..]);

        assert!(matches!(
            cmd.argv(None, OsFamily::Unix),
            Err(SuiteError::ToolchainNotFound(_))
        ));
    }

    #[test]
    fn test_standalone_artifacts_default() {
        assert_eq!(
            standalone_artifacts(&SuiteConfig::default()),
            args(&["brainfck:BRAINFCK", "brainfck:BRAINFCK_LAUNCHER"])
        );
    }

    #[test]
    fn test_launch_spec_mode() {
        let spec = LaunchSpec::Standalone {
            artifact_ids: vec![],
            main_class: "Main".to_string(),
            user_args: vec![],
        };
        assert_eq!(spec.mode(), LaunchMode::Standalone);
    }
}
