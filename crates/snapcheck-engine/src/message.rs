//! User-facing failure messages.

use std::path::Path;

use snapcheck_core::config::DiffTool;
use snapcheck_core::record::RecordReason;

use crate::outcome::{MismatchReport, SnapshotOutcome, Verification};

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn mismatch_body(report: &MismatchReport, diff_tool: &DiffTool) -> String {
    let mut body = String::new();
    if let Some(failure_path) = &report.failure_path {
        body.push_str(&diff_tool.format(&report.reference_path, failure_path));
        body.push_str("\n\n");
    }
    body.push_str(&report.message);
    body
}

/// Render a verification as the single message handed to the test runner
pub fn render(verification: &Verification, diff_tool: &DiffTool) -> Option<String> {
    let name = &verification.identity.base_name;
    let function = &verification.function;

    match &verification.outcome {
        SnapshotOutcome::Passed => None,
        SnapshotOutcome::MissingReference { path } => Some(format!(
            "No reference was found on disk. New snapshot was not recorded because \
             record mode is \"{}\".\n\nExpected reference at:\n\n{}",
            verification.record_mode,
            path.display()
        )),
        SnapshotOutcome::Mismatch(report) => Some(format!(
            "Snapshot \"{}\" does not match reference.\n\n{}",
            name,
            mismatch_body(report, diff_tool)
        )),
        SnapshotOutcome::Recorded {
            path,
            reason,
            mismatch,
        } => Some(match (reason, mismatch) {
            (RecordReason::FailedMismatch, Some(report)) => format!(
                "Snapshot \"{}\" does not match reference. A new snapshot was automatically \
                 recorded.\n\n{}",
                name,
                mismatch_body(report, diff_tool)
            ),
            (RecordReason::RecordAll, _) => format!(
                "Record mode is on. Automatically recorded snapshot: \u{2026}\n\nopen \"{}\"\n\n\
                 Turn record mode off and re-run \"{}\" to assert against the newly-recorded \
                 snapshot.",
                file_url(path),
                function
            ),
            _ => format!(
                "No reference was found on disk. Automatically recorded snapshot: \u{2026}\n\n\
                 open \"{}\"\n\nRe-run \"{}\" to assert against the newly-recorded snapshot.",
                file_url(path),
                function
            ),
        }),
    }
}
