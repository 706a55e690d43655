use std::path::PathBuf;
use std::time::Duration;

use snapcheck_core::record::RecordMode;

/// Per-assertion overrides
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Explicit snapshot name instead of the next ordinal
    pub name: Option<String>,
    /// Record mode for this assertion only, beats every scope
    pub record: Option<RecordMode>,
    /// Reference directory instead of `__Snapshots__/{file stem}`
    pub snapshot_directory: Option<PathBuf>,
    /// Async artifact timeout for this assertion only
    pub timeout: Option<Duration>,
}

impl VerifyOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_record(mut self, mode: RecordMode) -> Self {
        self.record = Some(mode);
        self
    }

    pub fn with_snapshot_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.snapshot_directory = Some(directory.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
