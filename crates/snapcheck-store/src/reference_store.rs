//! Reference persistence keyed by snapshot identity.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use snapcheck_core::identity::SnapshotIdentity;
use snapcheck_core::{log_op_end, log_op_error, log_op_start};
use snapcheck_core_types::schema::{OP_READ_REFERENCE, OP_WRITE_REFERENCE};

use crate::digest::content_digest;
use crate::dir_cache::DirectoryCache;
use crate::errors::{reference_read_error, reference_write_error, Result};

/// Reads and atomically writes reference files
#[derive(Debug, Default)]
pub struct ReferenceStore {
    dirs: DirectoryCache,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, identity: &SnapshotIdentity) -> bool {
        identity.path().is_file()
    }

    /// # Errors
    ///
    /// `ExErrorKind::Io` when the reference cannot be read
    pub fn read(&self, identity: &SnapshotIdentity) -> Result<Vec<u8>> {
        let path = identity.path();
        fs::read(&path).map_err(|e| {
            let err = reference_read_error(&path, e).with_identity(identity.to_string());
            log_op_error!(OP_READ_REFERENCE, err.clone(), duration_ms = 0u64);
            err
        })
    }

    /// Write the reference, creating its directory on first use
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` when the directory or file cannot be written; an
    /// existing reference is left intact in that case
    pub fn write(&self, identity: &SnapshotIdentity, bytes: &[u8]) -> Result<PathBuf> {
        let start = Instant::now();
        let path = identity.path();
        log_op_start!(
            OP_WRITE_REFERENCE,
            snapshot_path = %path.display(),
            bytes = bytes.len()
        );

        let result = self
            .dirs
            .write_within(&identity.directory, &path, bytes)
            .map_err(|err| reference_write_error(&path, err).with_identity(identity.to_string()));

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                log_op_end!(
                    OP_WRITE_REFERENCE,
                    duration_ms = duration_ms,
                    snapshot_path = %path.display(),
                    bytes = bytes.len(),
                    digest = %content_digest(bytes)
                );
                Ok(path)
            }
            Err(err) => {
                log_op_error!(OP_WRITE_REFERENCE, err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }
}
