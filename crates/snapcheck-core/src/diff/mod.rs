//! Diffing strategies.
//!
//! A diffing strategy decides whether a freshly produced format value
//! matches the stored reference and, when it does not, explains why.
//!
//! ## Built-in strategies
//!
//! - [`LineDiff`]: Myers line diff rendered as unified-style hunks
//! - [`ImageDiff`]: exact then tolerance-based pixel comparison
//! - [`BytesDiff`]: raw byte equality
//!
//! ```
//! use snapcheck_core::diff::{DiffStrategy, LineDiff};
//!
//! let diff = LineDiff::default();
//! assert!(diff.compare(&"a\nb".to_string(), &"a\nb".to_string()).is_none());
//! assert!(diff.compare(&"a\nb".to_string(), &"a\nc".to_string()).is_some());
//! ```

pub mod bytes;
pub mod lines;
pub mod model;
pub mod pixels;

pub use bytes::BytesDiff;
pub use lines::{diff_lines, render_hunks, Hunk, LineDiff, LineOp};
pub use model::{Artifact, ArtifactKind, DiffResult, DiffStrategy, FnDiff};
pub use pixels::ImageDiff;
