//! Snapshot identity resolution.
//!
//! A [`CallSite`] plus an optional name resolves to a [`SnapshotIdentity`]:
//! `{dir}/__Snapshots__/{file stem}/{function}.{name or ordinal}.{ext}`.
//! Unnamed snapshots draw ordinals from a [`CounterRegistry`] keyed by
//! module, file and function.

pub mod call_site;
pub mod counter;
pub mod resolver;

pub use call_site::CallSite;
pub use counter::{CallSiteKey, CounterRegistry, Position};
pub use resolver::{
    default_directory, sanitize_path_component, IdentityResolver, SnapshotIdentity, SNAPSHOTS_DIR,
};
