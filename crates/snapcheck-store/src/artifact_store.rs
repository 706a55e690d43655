//! Failure artifact quarantine.
//!
//! Artifacts mirror the test file layout under a single root:
//! `{root}/{test file stem}/{base name}[.reference|.difference].{ext}`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use snapcheck_core::diff::ArtifactKind;
use snapcheck_core::identity::SnapshotIdentity;
use snapcheck_core::{log_op_end, log_op_error, log_op_start};
use snapcheck_core_types::schema::OP_WRITE_ARTIFACT;

use crate::dir_cache::DirectoryCache;
use crate::errors::{artifact_write_error, Result};

/// Environment variable overriding the artifacts root
pub const ARTIFACTS_ENV_VAR: &str = "SNAPSHOT_ARTIFACTS";

/// Writes failure artifacts away from the reference tree
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    dirs: DirectoryCache,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dirs: DirectoryCache::new(),
        }
    }

    /// `SNAPSHOT_ARTIFACTS` when set and non-empty, else the temp directory
    pub fn from_env() -> Self {
        let root = std::env::var_os(ARTIFACTS_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an artifact of `kind` for `identity` is written
    pub fn artifact_path(
        &self,
        identity: &SnapshotIdentity,
        kind: ArtifactKind,
        extension: Option<&str>,
    ) -> PathBuf {
        let mut file_name = identity.base_name.clone();
        if let Some(suffix) = kind.file_suffix() {
            file_name.push('.');
            file_name.push_str(suffix);
        }
        if let Some(extension) = extension {
            file_name.push('.');
            file_name.push_str(extension);
        }
        self.root.join(&identity.test_file_stem).join(file_name)
    }

    /// # Errors
    ///
    /// `ExErrorKind::Io` when the artifact cannot be written
    pub fn write_artifact(
        &self,
        identity: &SnapshotIdentity,
        kind: ArtifactKind,
        extension: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let start = Instant::now();
        let path = self.artifact_path(identity, kind, extension);
        let dir = self.root.join(&identity.test_file_stem);
        log_op_start!(OP_WRITE_ARTIFACT, artifact_kind = %kind, snapshot_path = %path.display());

        let result = self
            .dirs
            .write_within(&dir, &path, bytes)
            .map_err(|err| artifact_write_error(&path, err).with_identity(identity.to_string()));

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                log_op_end!(
                    OP_WRITE_ARTIFACT,
                    duration_ms = duration_ms,
                    artifact_kind = %kind,
                    snapshot_path = %path.display(),
                    bytes = bytes.len()
                );
                Ok(path)
            }
            Err(err) => {
                log_op_error!(OP_WRITE_ARTIFACT, err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }
}
