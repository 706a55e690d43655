//! Record modes and the decision table applied to every assertion.
//!
//! | mode | reference | comparison | action |
//! |---|---|---|---|
//! | never | missing | - | fail, nothing written |
//! | never | present | differs | fail |
//! | never | present | equal | pass |
//! | missing | missing | - | record (reported as failure) |
//! | missing | present | differs | fail |
//! | missing | present | equal | pass |
//! | all | any | - | record (reported as failure) |
//! | failed | missing | - | record |
//! | failed | present | differs | record over the old reference |
//! | failed | present | equal | pass, nothing written |

use std::fmt;
use std::str::FromStr;

use crate::errors::SnapCheckError;

/// Environment variable selecting the record mode
pub const RECORD_ENV_VAR: &str = "SNAPSHOT_TESTING_RECORD";

/// When references may be (re)written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordMode {
    /// Never write; a missing reference is a failure
    Never,
    /// Write references that do not exist yet
    #[default]
    Missing,
    /// Overwrite every reference
    All,
    /// Write missing references and overwrite mismatching ones
    Failed,
}

impl RecordMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMode::Never => "never",
            RecordMode::Missing => "missing",
            RecordMode::All => "all",
            RecordMode::Failed => "failed",
        }
    }

    /// Interpret an environment value; unset means `Missing`, unrecognized
    /// values warn and also mean `Missing`
    pub fn from_env_value(value: Option<&str>) -> RecordMode {
        match value {
            None => RecordMode::Missing,
            Some(raw) => raw.parse().unwrap_or_else(|err: SnapCheckError| {
                tracing::warn!(
                    record_mode = raw,
                    error = %err,
                    "unrecognized {}, falling back to missing",
                    RECORD_ENV_VAR
                );
                RecordMode::Missing
            }),
        }
    }

    /// Mode selected by `SNAPSHOT_TESTING_RECORD`
    pub fn from_env() -> RecordMode {
        let value = std::env::var(RECORD_ENV_VAR).ok();
        Self::from_env_value(value.as_deref())
    }
}

impl fmt::Display for RecordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordMode {
    type Err = SnapCheckError;

    /// Tokens are case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(RecordMode::Never),
            "missing" => Ok(RecordMode::Missing),
            "all" => Ok(RecordMode::All),
            "failed" => Ok(RecordMode::Failed),
            other => Err(SnapCheckError::InvalidRecordMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Why a reference is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordReason {
    /// There was no usable reference
    NewReference,
    /// Record mode `all`
    RecordAll,
    /// Record mode `failed` and the reference did not match
    FailedMismatch,
}

/// What the engine does for one assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pass,
    /// No reference and recording is disabled
    FailMissing,
    FailMismatch,
    Record(RecordReason),
}

impl Action {
    /// Whether the reference file gets written
    pub fn writes_reference(&self) -> bool {
        matches!(self, Action::Record(_))
    }

    /// Whether the assertion reports a failure; every write is reported
    pub fn is_failure(&self) -> bool {
        !matches!(self, Action::Pass)
    }
}

/// Whether the diff must run before [`decide`] can be called
pub fn needs_comparison(mode: RecordMode, reference_exists: bool) -> bool {
    reference_exists && mode != RecordMode::All
}

/// The decision table
///
/// `differs` is only consulted when [`needs_comparison`] is true.
pub fn decide(mode: RecordMode, reference_exists: bool, differs: bool) -> Action {
    match (mode, reference_exists, differs) {
        (RecordMode::All, _, _) => Action::Record(RecordReason::RecordAll),
        (RecordMode::Never, false, _) => Action::FailMissing,
        (RecordMode::Missing | RecordMode::Failed, false, _) => {
            Action::Record(RecordReason::NewReference)
        }
        (_, true, false) => Action::Pass,
        (RecordMode::Failed, true, true) => Action::Record(RecordReason::FailedMismatch),
        (RecordMode::Never | RecordMode::Missing, true, true) => Action::FailMismatch,
    }
}
