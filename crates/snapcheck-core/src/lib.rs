//! SnapCheck Core - snapshot formats, diffing and decision logic
//!
//! This crate provides everything an assertion needs short of touching the
//! filesystem:
//! - Format strategies turning values into comparable, storable formats
//! - Line, pixel and byte diffing with failure artifacts
//! - Call-site identity resolution and per-function ordinal counters
//! - The record-mode decision table
//! - Scoped snapshot configuration (thread and task local)
//! - The error and logging facilities shared by the workspace

pub mod config;
pub mod diff;
pub mod errors;
pub mod format;
pub mod identity;
pub mod logging_facility;
pub mod record;

// Re-export commonly used types
pub use config::{DiffTool, SnapshotConfiguration};
pub use diff::{Artifact, ArtifactKind, DiffResult, DiffStrategy};
pub use errors::{ExError, ExErrorKind, Result, SnapCheckError};
pub use format::{FormatStrategy, PixelBuffer};
pub use identity::{CallSite, CounterRegistry, IdentityResolver, SnapshotIdentity};
pub use record::{Action, RecordMode, RecordReason};
