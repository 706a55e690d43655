//! Tagged outcomes of one snapshot assertion.
//!
//! Content mismatches and recordings are outcomes, not errors. Errors are
//! reserved for I/O failures, serialization failures and timeouts.

use std::path::PathBuf;

use snapcheck_core::config::DiffTool;
use snapcheck_core::identity::SnapshotIdentity;
use snapcheck_core::record::{RecordMode, RecordReason};

use crate::message;

/// Details of a failed comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchReport {
    /// Message produced by the diffing strategy
    pub message: String,
    /// The reference the value was compared against
    pub reference_path: PathBuf,
    /// Where the failing value was quarantined, if that write succeeded
    pub failure_path: Option<PathBuf>,
    /// Every artifact written for this failure
    pub artifacts: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Passed,
    /// The reference was written; always reported
    Recorded {
        path: PathBuf,
        reason: RecordReason,
        /// The mismatch that triggered the write in `failed` mode
        mismatch: Option<MismatchReport>,
    },
    Mismatch(MismatchReport),
    /// No reference and recording is disabled; nothing was written
    MissingReference { path: PathBuf },
}

impl SnapshotOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, SnapshotOutcome::Passed)
    }

    /// Whether this assertion wrote the reference file
    pub fn recorded(&self) -> bool {
        matches!(self, SnapshotOutcome::Recorded { .. })
    }
}

/// Result of verifying one snapshot
#[derive(Debug, Clone)]
pub struct Verification {
    pub identity: SnapshotIdentity,
    /// Name of the test function that made the assertion
    pub function: String,
    pub record_mode: RecordMode,
    pub outcome: SnapshotOutcome,
}

impl Verification {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }

    /// The user-facing failure text, `None` when the assertion passed
    pub fn failure_message(&self, diff_tool: &DiffTool) -> Option<String> {
        message::render(self, diff_tool)
    }
}
