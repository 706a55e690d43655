use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::atomic::atomic_write;
use crate::errors::{directory_error, Result};

/// Directories known to exist
///
/// The lock guards the set only; `create_dir_all` runs outside it. Two
/// threads racing on a new directory may both create it, which
/// `create_dir_all` tolerates.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    created: Mutex<HashSet<PathBuf>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_known(&self, dir: &Path) -> bool {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(dir)
    }

    /// Create `dir` and its parents unless already done
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` when the directory cannot be created
    pub fn ensure(&self, dir: &Path) -> Result<()> {
        if self.is_known(dir) {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| directory_error(dir, e))?;
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dir.to_path_buf());
        Ok(())
    }

    /// Atomically write `path` inside `dir`
    ///
    /// A cached directory removed behind the cache's back is created again
    /// and the write retried once.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` when the directory or file cannot be written
    pub fn write_within(&self, dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure(dir)?;
        match atomic_write(path, bytes) {
            Err(_) if !dir.is_dir() => {
                self.evict(dir);
                self.ensure(dir)?;
                atomic_write(path, bytes)
            }
            result => result,
        }
    }

    fn evict(&self, dir: &Path) {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(dir);
    }

    /// Forget every cached directory
    pub fn clear(&self) {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
