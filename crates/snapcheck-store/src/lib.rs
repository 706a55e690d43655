//! SnapCheck Store - filesystem persistence for references and artifacts
//!
//! Provides:
//! - Atomic temp→rename writes so readers never observe partial files
//! - Reference reads, writes and existence checks keyed by snapshot identity
//! - Failure artifact quarantine under a configurable artifacts root
//! - A lock-protected cache of directories already created

pub mod artifact_store;
pub mod atomic;
pub mod dir_cache;
pub mod digest;
pub mod errors;
pub mod reference_store;

// Re-export key types
pub use artifact_store::{ArtifactStore, ARTIFACTS_ENV_VAR};
pub use errors::Result;
pub use reference_store::ReferenceStore;
