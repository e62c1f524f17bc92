//! Resolving distribution ids to classpath entries.

use crate::config::SuiteConfig;
use crate::error::{Result, SuiteError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the directory holding built distribution jars.
pub const DIST_ROOT_ENV: &str = "BF_DIST_ROOT";

/// Resolves distribution ids to classpath entries.
pub trait DistributionResolver {
    /// Classpath entries for `ids` and their runtime dependencies.
    ///
    /// Fails with `UnresolvedDistribution` for any unknown id.
    fn classpath(&self, ids: &[String]) -> Result<Vec<PathBuf>>;
}

/// Resolver over the suite descriptor and a directory of built jars.
#[derive(Debug, Clone)]
pub struct SuiteDistributionResolver<'a> {
    config: &'a SuiteConfig,
    dist_root: PathBuf,
}

impl<'a> SuiteDistributionResolver<'a> {
    /// A relative `dist_root` is anchored at the current directory, so the
    /// classpath stays valid when the launched process runs elsewhere.
    pub fn new(config: &'a SuiteConfig, dist_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            dist_root: absolute(dist_root.into()),
        }
    }

    /// Jars under `BF_DIST_ROOT`, falling back to `mxbuild/dists`.
    pub fn from_env(config: &'a SuiteConfig) -> Self {
        let root = std::env::var_os(DIST_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("mxbuild").join("dists"));
        Self::new(config, root)
    }

    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    fn jar_path(&self, id: &str, configured: Option<&Path>) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.dist_root.join(path),
            None => {
                let local = id.rsplit(':').next().unwrap_or(id);
                self.dist_root
                    .join(format!("{}.jar", local.to_ascii_lowercase()))
            }
        }
    }

    fn visit(&self, id: &str, seen: &mut HashSet<String>, out: &mut Vec<PathBuf>) -> Result<()> {
        let dist = self
            .config
            .distribution(id)
            .ok_or_else(|| SuiteError::UnresolvedDistribution(id.to_string()))?;
        if !seen.insert(id.to_string()) {
            return Ok(());
        }

        if !dist.native {
            let jar = self.jar_path(id, dist.path.as_deref());
            if !out.contains(&jar) {
                out.push(jar);
            }
        }
        for dep in &dist.dist_dependencies {
            self.visit(dep, seen, out)?;
        }
        Ok(())
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot anchor relative dist root");
            path
        }
    }
}

impl DistributionResolver for SuiteDistributionResolver<'_> {
    fn classpath(&self, ids: &[String]) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for id in ids {
            self.visit(id, &mut seen, &mut entries)?;
        }
        Ok(entries)
    }
}
