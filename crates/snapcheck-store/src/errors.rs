//! Error handling for snapcheck-store
//!
//! Wraps snapcheck-core ExError with store-specific helpers

use std::path::Path;

use snapcheck_core::errors::{ExError, ExErrorKind, SnapCheckError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Create a reference read error
pub fn reference_read_error(path: &Path, err: std::io::Error) -> ExError {
    SnapCheckError::ReferenceRead {
        path: display(path),
        message: err.to_string(),
    }
    .into()
}

/// Wrap a failed reference write, keeping the underlying cause
pub fn reference_write_error(path: &Path, cause: ExError) -> ExError {
    ExError::from(SnapCheckError::ReferenceWrite {
        path: display(path),
        message: cause.message().to_string(),
    })
    .with_source(cause)
}

/// Wrap a failed artifact write, keeping the underlying cause
pub fn artifact_write_error(path: &Path, cause: ExError) -> ExError {
    ExError::from(SnapCheckError::ArtifactWrite {
        path: display(path),
        message: cause.message().to_string(),
    })
    .with_source(cause)
}

/// Create a directory creation error
pub fn directory_error(path: &Path, err: std::io::Error) -> ExError {
    SnapCheckError::DirectoryCreate {
        path: display(path),
        message: err.to_string(),
    }
    .into()
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}
