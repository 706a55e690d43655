use std::path::Path;
use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Content mismatches are never errors: they surface as snapshot outcomes.
/// Everything here is a hard failure for the assertion that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidRecordMode,

    // Artifact production
    Serialization,
    ImageCoding,
    /// The artifact future did not complete within the configured timeout
    Timeout,

    // Persistence
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidRecordMode => "ERR_INVALID_RECORD_MODE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ImageCoding => "ERR_IMAGE_CODING",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable classification for programmatic handling plus the
/// snapshot path and identity involved, for human-readable diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    identity: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            identity: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add snapshot identity context (the resolved base name)
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the identity context, if any
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(identity) = &self.identity {
            write!(f, " (snapshot: {})", identity)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for snapshot operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapCheckError {
    // ===== Persistence Errors =====
    /// Reference file could not be read
    #[error("Failed to read reference {path}: {message}")]
    ReferenceRead { path: String, message: String },

    /// Reference file could not be written
    #[error("Failed to write reference {path}: {message}")]
    ReferenceWrite { path: String, message: String },

    /// Failure artifact could not be written
    #[error("Failed to write artifact {path}: {message}")]
    ArtifactWrite { path: String, message: String },

    /// Snapshot or artifact directory could not be created
    #[error("Failed to create directory {path}: {message}")]
    DirectoryCreate { path: String, message: String },

    // ===== Artifact Production Errors =====
    /// The value to snapshot never arrived
    #[error("Timed out waiting for artifact {identity} after {timeout_ms}ms")]
    ArtifactTimeout { identity: String, timeout_ms: u64 },

    /// The value could not be serialized into its format
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An image could not be encoded
    #[error("Image encoding error: {message}")]
    ImageEncoding { message: String },

    // ===== Configuration Errors =====
    /// Unrecognized record mode token
    #[error("Invalid record mode '{value}': expected one of never, missing, all, failed")]
    InvalidRecordMode { value: String },
}

impl From<SnapCheckError> for ExError {
    fn from(err: SnapCheckError) -> Self {
        let message = err.to_string();
        match err {
            SnapCheckError::ReferenceRead { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("read_reference")
                .with_path(path)
                .with_message(message),
            SnapCheckError::ReferenceWrite { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("write_reference")
                .with_path(path)
                .with_message(message),
            SnapCheckError::ArtifactWrite { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("write_artifact")
                .with_path(path)
                .with_message(message),
            SnapCheckError::DirectoryCreate { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("create_dir")
                .with_path(path)
                .with_message(message),
            SnapCheckError::ArtifactTimeout { identity, .. } => {
                ExError::new(ExErrorKind::Timeout)
                    .with_op("produce_artifact")
                    .with_identity(identity)
                    .with_message(message)
            }
            SnapCheckError::Serialization { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("serialize")
                .with_message(message),
            SnapCheckError::ImageEncoding { .. } => ExError::new(ExErrorKind::ImageCoding)
                .with_op("encode_png")
                .with_message(message),
            SnapCheckError::InvalidRecordMode { .. } => {
                ExError::new(ExErrorKind::InvalidRecordMode)
                    .with_op("parse_record_mode")
                    .with_message(message)
            }
        }
    }
}
