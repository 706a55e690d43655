//! Diff result model shared by every diffing strategy.

use serde::Serialize;

/// Role of an artifact produced for a failed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The stored reference as it was on disk
    Reference,
    /// The newly produced value that failed to match
    Failure,
    /// A rendering of where the two diverge
    Difference,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Reference => "reference",
            ArtifactKind::Failure => "failure",
            ArtifactKind::Difference => "difference",
        }
    }

    /// Infix inserted before the extension when the artifact is written.
    ///
    /// Failure artifacts keep the plain snapshot file name so diff tools
    /// can open reference and failure side by side.
    pub fn file_suffix(&self) -> Option<&'static str> {
        match self {
            ArtifactKind::Failure => None,
            ArtifactKind::Reference => Some("reference"),
            ArtifactKind::Difference => Some("difference"),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named binary payload attached to a failed comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// File extension matching the artifact's MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "text/x-diff" => "patch",
            "application/json" => "json",
            "text/plain" => "txt",
            _ => "bin",
        }
    }
}

/// Explanation of why two format values differ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub message: String,
    pub artifacts: Vec<Artifact>,
}

impl DiffResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Find the first artifact of the given kind
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// Comparison seam between a reference and a freshly produced value
///
/// Returning `None` means the values are equal and no action is needed.
pub trait DiffStrategy<F: ?Sized>: Send + Sync {
    fn compare(&self, reference: &F, actual: &F) -> Option<DiffResult>;
}

/// Adapter turning a closure into a [`DiffStrategy`]
///
/// ```
/// use snapcheck_core::diff::{DiffResult, DiffStrategy, FnDiff};
///
/// let case_insensitive = FnDiff(|a: &String, b: &String| {
///     (!a.eq_ignore_ascii_case(b)).then(|| DiffResult::new("case-insensitive mismatch"))
/// });
/// assert!(case_insensitive.compare(&"ABC".to_string(), &"abc".to_string()).is_none());
/// ```
pub struct FnDiff<Func>(pub Func);

impl<F, Func> DiffStrategy<F> for FnDiff<Func>
where
    F: ?Sized,
    Func: Fn(&F, &F) -> Option<DiffResult> + Send + Sync,
{
    fn compare(&self, reference: &F, actual: &F) -> Option<DiffResult> {
        (self.0)(reference, actual)
    }
}
