//! CI configuration verification.
//!
//! The suite keeps a copy of the platform's shared CI definitions
//! (`common.json`). `verify_ci` checks that the copy matches upstream, or
//! syncs it when asked.

use crate::error::{Result, SuiteError};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a successful verification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CiVerification {
    pub local: PathBuf,
    pub upstream: PathBuf,
    pub digest: String,
    /// Whether the local copy was overwritten from upstream.
    pub synced: bool,
}

/// Compare `local` with `upstream` structurally.
///
/// With `sync`, a local copy that is absent, differs, or is not valid JSON is
/// replaced by upstream and the call succeeds.
pub fn verify_ci(local: &Path, upstream: &Path, sync: bool) -> Result<CiVerification> {
    let upstream_bytes = std::fs::read(upstream)?;
    let upstream_value: Value = serde_json::from_slice(&upstream_bytes)?;
    let upstream_digest = sha256_hex(&upstream_bytes);

    let local_bytes = match std::fs::read(local) {
        Ok(bytes) => Some(bytes),
        Err(e) if sync && e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    if let Some(bytes) = &local_bytes {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(local_value) if local_value == upstream_value => {
                info!(local = %local.display(), "CI config is in sync");
                return Ok(CiVerification {
                    local: local.to_path_buf(),
                    upstream: upstream.to_path_buf(),
                    digest: upstream_digest,
                    synced: false,
                });
            }
            Ok(_) => {}
            // An unparseable local copy is replaced like any other mismatch.
            Err(e) if sync => {
                warn!(local = %local.display(), error = %e, "Local CI config is not valid JSON");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !sync {
        let local_digest = local_bytes
            .as_deref()
            .map(sha256_hex)
            .unwrap_or_default();
        warn!(local = %local.display(), upstream = %upstream.display(), "CI config differs from upstream");
        return Err(SuiteError::CiConfigMismatch {
            local: local.to_path_buf(),
            upstream: upstream.to_path_buf(),
            local_digest,
            upstream_digest,
        });
    }

    std::fs::write(local, &upstream_bytes)?;
    info!(local = %local.display(), upstream = %upstream.display(), "Synced CI config from upstream");
    Ok(CiVerification {
        local: local.to_path_buf(),
        upstream: upstream.to_path_buf(),
        digest: upstream_digest,
        synced: true,
    })
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_formatting_differences_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let local = write(dir.path(), "local.json", r#"{"jdks":{"openjdk11":"11.0.8"}}"#);
        let upstream = write(
            dir.path(),
            "upstream.json",
            "{\n  \"jdks\": { \"openjdk11\": \"11.0.8\" }\n}\n",
        );

        let result = verify_ci(&local, &upstream, false).unwrap();
        assert!(!result.synced);
        assert_eq!(result.digest.len(), 64);
    }

    #[test]
    fn test_mismatch_fails_without_sync() {
        let dir = tempfile::tempdir().unwrap();
        let local = write(dir.path(), "local.json", r#"{"jdks":{}}"#);
        let upstream = write(dir.path(), "upstream.json", r#"{"jdks":{"labsjdk":"ce-11"}}"#);

        let err = verify_ci(&local, &upstream, false).unwrap_err();
        assert!(matches!(err, SuiteError::CiConfigMismatch { .. }));
        assert_eq!(std::fs::read_to_string(&local).unwrap(), r#"{"jdks":{}}"#);
    }

    #[test]
    fn test_sync_overwrites_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = write(dir.path(), "local.json", r#"{"jdks":{}}"#);
        let upstream = write(dir.path(), "upstream.json", r#"{"jdks":{"labsjdk":"ce-11"}}"#);

        let result = verify_ci(&local, &upstream, true).unwrap();
        assert!(result.synced);
        assert_eq!(
            std::fs::read_to_string(&local).unwrap(),
            r#"{"jdks":{"labsjdk":"ce-11"}}"#
        );
    }

    #[test]
    fn test_sync_repairs_corrupt_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = write(dir.path(), "local.json", "{ broken");
        let upstream = write(dir.path(), "upstream.json", "{}");

        assert!(matches!(
            verify_ci(&local, &upstream, false).unwrap_err(),
            SuiteError::Json(_)
        ));
        let result = verify_ci(&local, &upstream, true).unwrap();
        assert!(result.synced);
        assert_eq!(std::fs::read_to_string(&local).unwrap(), "{}");
    }

    #[test]
    fn test_sync_creates_missing_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("common.json");
        let upstream = write(dir.path(), "upstream.json", "{}");

        assert!(verify_ci(&local, &upstream, false).is_err());
        assert!(verify_ci(&local, &upstream, true).unwrap().synced);
        assert!(local.exists());
    }

    #[test]
    fn test_missing_upstream_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let local = write(dir.path(), "local.json", "{}");
        let err = verify_ci(&local, &dir.path().join("nope.json"), true).unwrap_err();
        assert!(matches!(err, SuiteError::Io(_)));
    }
}
