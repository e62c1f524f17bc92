//! Platform home discovery, Java toolchain lookup and OS executable naming.

use crate::config::ExecutableNaming;
use crate::error::{Result, SuiteError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables consulted for the platform home, in order.
pub const PLATFORM_HOME_ENV: [&str; 2] = ["BF_PLATFORM_HOME", "GRAALVM_HOME"];

/// Environment variable naming the Java toolchain.
pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// Locates an assembled platform installation.
pub trait PlatformLocator {
    /// Return the platform home, or `PlatformNotFound`.
    fn platform_home(&self) -> Result<PathBuf>;
}

/// A fixed platform root that must exist as a directory.
#[derive(Debug, Clone)]
pub struct FixedPlatformLocator {
    root: PathBuf,
}

impl FixedPlatformLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PlatformLocator for FixedPlatformLocator {
    fn platform_home(&self) -> Result<PathBuf> {
        existing_dir(&self.root)
    }
}

/// Reads the platform home from `BF_PLATFORM_HOME`, then `GRAALVM_HOME`.
#[derive(Debug, Clone, Default)]
pub struct EnvPlatformLocator;

impl PlatformLocator for EnvPlatformLocator {
    fn platform_home(&self) -> Result<PathBuf> {
        let root = PLATFORM_HOME_ENV
            .iter()
            .find_map(|var| std::env::var_os(var).filter(|v| !v.is_empty()))
            .ok_or_else(|| {
                SuiteError::PlatformNotFound(format!(
                    "none of {} is set",
                    PLATFORM_HOME_ENV.join(", ")
                ))
            })?;
        existing_dir(Path::new(&root))
    }
}

fn existing_dir(root: &Path) -> Result<PathBuf> {
    if root.is_dir() {
        debug!(home = %root.display(), "Located platform home");
        Ok(root.to_path_buf())
    } else {
        Err(SuiteError::PlatformNotFound(format!(
            "{} is not a directory",
            root.display()
        )))
    }
}

/// Operating system family for executable naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Launcher file name for `base` under this OS.
    pub fn launcher_name(&self, base: &str, naming: &ExecutableNaming) -> String {
        let suffix = match self {
            OsFamily::Windows => &naming.windows_suffix,
            OsFamily::Unix => &naming.unix_suffix,
        };
        format!("{base}{suffix}")
    }

    /// Separator between classpath entries.
    pub fn path_separator(&self) -> &'static str {
        match self {
            OsFamily::Windows => ";",
            OsFamily::Unix => ":",
        }
    }

    /// Native binary file name (`.exe` on Windows).
    pub fn exe_name(&self, base: &str) -> String {
        match self {
            OsFamily::Windows => format!("{base}.exe"),
            OsFamily::Unix => base.to_string(),
        }
    }
}

/// A Java toolchain used to run standalone launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub home: PathBuf,
}

impl Toolchain {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Toolchain from `JAVA_HOME`.
    pub fn from_env() -> Result<Self> {
        let home = std::env::var_os(JAVA_HOME_ENV)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SuiteError::ToolchainNotFound(format!("{JAVA_HOME_ENV} is not set")))?;
        let toolchain = Self::new(home);
        if !toolchain.home.is_dir() {
            return Err(SuiteError::ToolchainNotFound(format!(
                "{} is not a directory",
                toolchain.home.display()
            )));
        }
        Ok(toolchain)
    }

    pub fn java_executable(&self, os: OsFamily) -> PathBuf {
        self.home.join("bin").join(os.exe_name("java"))
    }
}
