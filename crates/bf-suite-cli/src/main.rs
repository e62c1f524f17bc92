//! bf-suite - build and launch tooling for the Brainf*ck language suite
//!
//! ## Commands
//!
//! - `bf`: run the launcher embedded in an assembled platform image
//! - `bf-standalone`: run the launcher from distribution jars
//! - `verify-ci`: check the CI config against the upstream suite
//! - `gate`: run tagged gate tasks
//! - `vm-config`: list or show registered VM build profiles
//! - `component`: show the language component registration

mod process;

use anyhow::{Context, Result};
use bf_suite_ci::BrainfckGate;
use bf_suite_core::{
    parse_gate_tags, standalone_artifacts, verify_ci, EnvPlatformLocator, FailurePolicy,
    FixedPlatformLocator, GateRunResult, LauncherResolver, OsFamily, PlatformLocator,
    SuiteConfig, SuiteDistributionResolver, TaskOutcome, Toolchain, VmConfigRegistry,
    DOUBLE_DASH,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::runtime::Handle;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "bf-suite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and launch tooling for the Brainf*ck language suite", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Suite config file (JSON); built-in defaults when omitted
    #[arg(long, global = true, env = "BF_SUITE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Brainf*ck launcher embedded in the platform
    Bf {
        /// Working directory for the launched process
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Platform home (default: BF_PLATFORM_HOME, then GRAALVM_HOME)
        #[arg(long)]
        platform_home: Option<PathBuf>,

        /// Arguments passed to the launcher
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run Brainf*ck standalone from distribution jars
    BfStandalone {
        /// Working directory for the launched process
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Directory containing built distribution jars
        #[arg(long, env = "BF_DIST_ROOT")]
        dist_root: Option<PathBuf>,

        /// JDK used to run the launcher
        #[arg(long, env = "JAVA_HOME")]
        java_home: Option<PathBuf>,

        /// VM flags, then `--`, then launcher arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Verify the CI configuration against the upstream suite
    VerifyCi {
        /// Overwrite the local copy from upstream instead of failing
        #[arg(long)]
        sync: bool,

        /// Local CI config (default from suite config)
        #[arg(long)]
        local: Option<PathBuf>,

        /// Upstream CI config (default from suite config)
        #[arg(long)]
        upstream: Option<PathBuf>,
    },

    /// Run gate tasks
    Gate {
        /// Tags to run (comma-separated: unittest,jackpot); all when empty
        #[arg(short, long, default_value = "")]
        tags: String,

        /// Stop at the first failing task
        #[arg(long)]
        stop_on_failure: bool,

        /// Working directory for gate commands
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Print the gate result as JSON
        #[arg(long)]
        report_json: bool,
    },

    /// VM build profiles
    VmConfig {
        #[command(subcommand)]
        action: VmConfigAction,
    },

    /// Show the language component registration
    Component,
}

#[derive(Subcommand)]
enum VmConfigAction {
    /// List profile names in registration order
    List,

    /// Show a profile's component tags and env file
    Show {
        /// Profile name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let raw: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let cli = Cli::parse_from(&raw);

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    bf_suite_core::init_tracing(cli.json, level);

    let config = match &cli.config {
        Some(path) => SuiteConfig::load(path)
            .with_context(|| format!("Failed to load suite config {}", path.display()))?,
        None => SuiteConfig::default(),
    };

    match cli.command {
        Commands::Bf {
            cwd,
            platform_home,
            args,
        } => {
            let args = restore_leading_separator(&raw, args);
            cmd_bf(&config, platform_home, cwd.as_deref(), &args).await
        }
        Commands::BfStandalone {
            cwd,
            dist_root,
            java_home,
            args,
        } => {
            let args = restore_leading_separator(&raw, args);
            cmd_bf_standalone(&config, dist_root, java_home, cwd.as_deref(), &args).await
        }
        Commands::VerifyCi {
            sync,
            local,
            upstream,
        } => cmd_verify_ci(&config, local, upstream, sync),
        Commands::Gate {
            tags,
            stop_on_failure,
            cwd,
            report_json,
        } => cmd_gate(&config, &tags, stop_on_failure, cwd.as_deref(), report_json).await,
        Commands::VmConfig { action } => cmd_vm_config(action),
        Commands::Component => cmd_component(&config),
    }
}

/// Put back a `--` that clap consumed as its own escape token.
///
/// Trailing launcher args are a verbatim suffix of the raw command line. clap
/// drops a `--` only when it comes before the first trailing value, so a
/// `--` directly in front of that suffix in `raw` belongs to the launcher.
fn restore_leading_separator(raw: &[String], parsed: Vec<String>) -> Vec<String> {
    let Some(before) = raw.len().checked_sub(parsed.len() + 1) else {
        return parsed;
    };
    if raw[before] != DOUBLE_DASH || raw[before + 1..] != parsed[..] {
        return parsed;
    }
    let mut args = Vec::with_capacity(parsed.len() + 1);
    args.push(DOUBLE_DASH.to_string());
    args.extend(parsed);
    args
}

/// Run the launcher from the platform home
async fn cmd_bf(
    config: &SuiteConfig,
    platform_home: Option<PathBuf>,
    cwd: Option<&Path>,
    args: &[String],
) -> Result<ExitCode> {
    let locator: Box<dyn PlatformLocator> = match platform_home {
        Some(home) => Box::new(FixedPlatformLocator::new(home)),
        None => Box::new(EnvPlatformLocator),
    };

    let command = LauncherResolver::new(config)
        .resolve_embedded(locator.as_ref(), args)
        .context("Failed to resolve embedded launcher")?;

    info!(exe = %command.args[0], "Launching embedded Brainf*ck");
    let code = process::run_command(&command.args, cwd).await?;
    Ok(process::exit_code(code))
}

/// Run the launcher from distribution jars
async fn cmd_bf_standalone(
    config: &SuiteConfig,
    dist_root: Option<PathBuf>,
    java_home: Option<PathBuf>,
    cwd: Option<&Path>,
    args: &[String],
) -> Result<ExitCode> {
    let dists = match dist_root {
        Some(root) => SuiteDistributionResolver::new(config, root),
        None => SuiteDistributionResolver::from_env(config),
    };
    let toolchain = match java_home {
        Some(home) => Toolchain::new(home),
        None => Toolchain::from_env().context("No JDK configured for standalone launch")?,
    };

    let command = LauncherResolver::new(config)
        .resolve_standalone(
            &dists,
            &standalone_artifacts(config),
            config.launcher_main_class(),
            args,
        )
        .context("Failed to resolve standalone launcher")?;
    let argv = command.argv(Some(&toolchain), OsFamily::current())?;

    info!(java = %argv[0], dist_root = %dists.dist_root().display(), "Launching standalone Brainf*ck");
    let code = process::run_command(&argv, cwd).await?;
    Ok(process::exit_code(code))
}

/// Verify CI configuration
fn cmd_verify_ci(
    config: &SuiteConfig,
    local: Option<PathBuf>,
    upstream: Option<PathBuf>,
    sync: bool,
) -> Result<ExitCode> {
    let local = local.unwrap_or_else(|| config.ci.local.clone());
    let upstream = upstream.unwrap_or_else(|| config.ci.upstream.clone());

    let verification = verify_ci(&local, &upstream, sync)?;
    if verification.synced {
        println!(
            "Synced {} from {}",
            verification.local.display(),
            verification.upstream.display()
        );
    } else {
        println!("✓ {} is in sync", verification.local.display());
    }
    println!("Digest: {}", verification.digest);
    Ok(ExitCode::SUCCESS)
}

/// Run gate tasks selected by tag
async fn cmd_gate(
    config: &SuiteConfig,
    tags: &str,
    stop_on_failure: bool,
    cwd: Option<&Path>,
    report_json: bool,
) -> Result<ExitCode> {
    let policy = if stop_on_failure {
        FailurePolicy::StopOnFirstFailure
    } else {
        FailurePolicy::ContinueOnFailure
    };
    let requested = parse_gate_tags(tags);

    let gate = BrainfckGate::build(config, Handle::current(), policy, cwd);
    let result = BrainfckGate::run(gate, requested)
        .await
        .context("Gate failed to run")?;

    if report_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_gate_result(&result);
    }

    if result.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        anyhow::bail!("Gate failed with {} violation(s)", result.failed_count())
    }
}

fn print_gate_result(result: &GateRunResult) {
    println!("Gate run: {}", result.run_id);
    println!(
        "Status: {}",
        if result.passed() { "✓ PASSED" } else { "✗ FAILED" }
    );
    println!("Duration: {}ms", result.duration_ms);
    println!();

    for task in &result.tasks {
        let status = match &task.outcome {
            TaskOutcome::Passed => "✓",
            TaskOutcome::Failed { .. } => "✗",
            TaskOutcome::Skipped => "-",
            TaskOutcome::NotRun => "·",
        };
        println!("  {} {} ({}ms)", status, task.name, task.duration_ms);
    }

    let violations = result.violations();
    if !violations.is_empty() {
        println!();
        println!("Violations:");
        for (task, error) in violations {
            println!("  - {}: {}", task, error);
        }
    }

    println!();
    println!(
        "Summary: {} passed, {} failed, {} skipped",
        result.passed_count(),
        result.failed_count(),
        result.skipped_count()
    );
}

/// List or show VM profiles
fn cmd_vm_config(action: VmConfigAction) -> Result<ExitCode> {
    let registry = VmConfigRegistry::with_brainfck_profiles()?;
    match action {
        VmConfigAction::List => {
            for name in registry.list_profiles() {
                println!("{}", name);
            }
        }
        VmConfigAction::Show { name } => {
            let profile = registry.resolve(&name)?;
            let tags: Vec<&str> = profile.tags.iter().map(|t| t.id()).collect();
            println!("Profile: {}", profile.name);
            println!("Components: {}", tags.join(","));
            println!("Env file: {}", profile.env_file);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the language component registration
fn cmd_component(config: &SuiteConfig) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&config.component)?);
    Ok(ExitCode::SUCCESS)
}
