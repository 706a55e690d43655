//! Scoped snapshot configuration.
//!
//! Every field resolves to the innermost enclosing scope that set it, then
//! to a global default: record mode from `SNAPSHOT_TESTING_RECORD` (else
//! `missing`), [`DiffTool::Default`], and a 5 second artifact timeout.

pub mod diff_tool;
pub mod scope;

use std::time::Duration;

use crate::record::RecordMode;

pub use diff_tool::DiffTool;
pub use scope::{current_stack, with_snapshot_configuration, with_snapshot_configuration_async};

/// How long an async assertion waits for its artifact by default
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One configuration scope; `None` fields defer to outer scopes
#[derive(Debug, Clone, Default)]
pub struct SnapshotConfiguration {
    pub record: Option<RecordMode>,
    pub diff_tool: Option<DiffTool>,
    pub timeout: Option<Duration>,
}

impl SnapshotConfiguration {
    pub fn record(mode: RecordMode) -> Self {
        Self {
            record: Some(mode),
            ..Self::default()
        }
    }

    pub fn with_record(mut self, mode: RecordMode) -> Self {
        self.record = Some(mode);
        self
    }

    pub fn with_diff_tool(mut self, diff_tool: DiffTool) -> Self {
        self.diff_tool = Some(diff_tool);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The effective stack merged field by field, innermost first
pub fn current_configuration() -> SnapshotConfiguration {
    current_stack()
        .into_iter()
        .rev()
        .fold(SnapshotConfiguration::default(), |merged, scope| {
            SnapshotConfiguration {
                record: merged.record.or(scope.record),
                diff_tool: merged.diff_tool.or(scope.diff_tool),
                timeout: merged.timeout.or(scope.timeout),
            }
        })
}

/// explicit override, then innermost scope, then environment, then `missing`
pub fn effective_record_mode(explicit: Option<RecordMode>) -> RecordMode {
    explicit
        .or_else(|| current_configuration().record)
        .unwrap_or_else(RecordMode::from_env)
}

pub fn effective_diff_tool() -> DiffTool {
    current_configuration().diff_tool.unwrap_or_default()
}

pub fn effective_timeout() -> Duration {
    current_configuration().timeout.unwrap_or(DEFAULT_TIMEOUT)
}
