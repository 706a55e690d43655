//! SnapCheck Engine - snapshot verification orchestration
//!
//! Coordinates format strategies, identity resolution, the record-mode
//! decision table and the persistence layer. The boundary is a single
//! `Option<String>` per assertion: `None` passes, `Some(message)` is the
//! complete text for the human reading the test output.
//!
//! ```no_run
//! use snapcheck_engine::assert_snapshot;
//! use snapcheck_engine::format::lines;
//!
//! assert_snapshot!("Hello, world!", lines());
//! ```

pub mod engine;
pub mod macros;
pub mod message;
pub mod options;
pub mod outcome;

pub use engine::{SnapshotEngine, SnapshotEngineBuilder};
pub use options::VerifyOptions;
pub use outcome::{MismatchReport, SnapshotOutcome, Verification};

// Strategies and configuration callers need alongside the macros
pub use snapcheck_core::config::{
    with_snapshot_configuration, with_snapshot_configuration_async, DiffTool, SnapshotConfiguration,
};
pub use snapcheck_core::format;
pub use snapcheck_core::record::RecordMode;

#[doc(hidden)]
pub use snapcheck_core as __core;
