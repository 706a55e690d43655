//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{io_error, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Sibling temp path unique to this process and write
///
/// Concurrent writers of the same target must never share a temp file.
fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let unique = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target_path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        unique
    ))
}

/// Atomically write bytes to a file
///
/// The parent directory must already exist. On failure the temp file is
/// removed and the target is left untouched.
///
/// # Errors
///
/// `ExErrorKind::Io` when the temp file cannot be written or renamed
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target_path);

    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("write_temp", &temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", target_path, e));
    }

    Ok(())
}
