//! Snapshot verification orchestration.
//!
//! ## Pipeline (in order):
//! 1. Resolve record mode (options → scope → environment → missing)
//! 2. Resolve identity (consumes an ordinal for unnamed snapshots)
//! 3. Serialize the value (async: await it under the timeout first)
//! 4. Load the reference; empty references count as missing
//! 5. Diff, when the decision table needs it
//! 6. Decide, then write the reference and/or quarantine artifacts

use std::borrow::Borrow;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use snapcheck_core::config::{effective_diff_tool, effective_record_mode, effective_timeout};
use snapcheck_core::diff::{ArtifactKind, DiffResult};
use snapcheck_core::errors::{Result, SnapCheckError};
use snapcheck_core::format::FormatStrategy;
use snapcheck_core::identity::{CallSite, CounterRegistry, IdentityResolver, SnapshotIdentity};
use snapcheck_core::record::{decide, needs_comparison, Action, RecordMode};
use snapcheck_core::{log_op_end, log_op_error, log_op_start};
use snapcheck_core_types::schema::OP_VERIFY_SNAPSHOT;
use snapcheck_store::{ArtifactStore, ReferenceStore};

use crate::options::VerifyOptions;
use crate::outcome::{MismatchReport, SnapshotOutcome, Verification};

/// Verifies values against references on disk
///
/// `Send + Sync`; one instance serves every test thread.
#[derive(Debug)]
pub struct SnapshotEngine {
    resolver: IdentityResolver,
    references: ReferenceStore,
    artifacts: ArtifactStore,
}

static GLOBAL_ENGINE: OnceLock<SnapshotEngine> = OnceLock::new();

impl Default for SnapshotEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SnapshotEngine {
    /// The process-wide engine used by the assertion macros
    pub fn global() -> &'static SnapshotEngine {
        GLOBAL_ENGINE.get_or_init(SnapshotEngine::default)
    }

    pub fn builder() -> SnapshotEngineBuilder {
        SnapshotEngineBuilder::default()
    }

    pub fn registry(&self) -> &Arc<CounterRegistry> {
        self.resolver.registry()
    }

    pub fn artifacts_root(&self) -> &std::path::Path {
        self.artifacts.root()
    }

    fn resolve_identity<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> SnapshotIdentity {
        self.resolver.resolve(
            site,
            options.name.as_deref(),
            strategy.path_extension(),
            options.snapshot_directory.as_deref(),
        )
    }

    /// Verify `value` against its reference
    ///
    /// # Errors
    ///
    /// `Serialization`/`ImageCoding` when the value cannot be turned into
    /// bytes, `Io` when the reference cannot be read or written or a failure
    /// artifact cannot be quarantined. A content mismatch is never an error.
    pub fn verify<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        value: &V,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> Result<Verification> {
        let mode = effective_record_mode(options.record);
        let identity = self.resolve_identity(strategy, site, options);
        let start = self.begin(&identity, mode);
        let result = strategy
            .serialize(value)
            .and_then(|actual| self.settle(strategy, actual, &identity, mode));
        self.finish(&identity, start, result)
            .map(|outcome| Verification {
                identity,
                function: site.function.clone(),
                record_mode: mode,
                outcome,
            })
    }

    /// Await the artifact under the effective timeout, then verify it
    ///
    /// Identity and record mode are resolved before awaiting, so ordinals
    /// follow call order. The start event is logged before the wait. On
    /// timeout the future is dropped.
    ///
    /// # Errors
    ///
    /// `Timeout` when the future does not complete in time, otherwise as
    /// [`SnapshotEngine::verify`].
    pub async fn verify_async<V, F, T, Fut>(
        &self,
        strategy: &FormatStrategy<V, F>,
        future: Fut,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> Result<Verification>
    where
        V: ?Sized,
        T: Borrow<V>,
        Fut: Future<Output = T>,
    {
        let mode = effective_record_mode(options.record);
        let timeout = options.timeout.unwrap_or_else(effective_timeout);
        let identity = self.resolve_identity(strategy, site, options);
        let start = self.begin(&identity, mode);

        let result = match tokio::time::timeout(timeout, future).await {
            Ok(value) => strategy
                .serialize(Borrow::<V>::borrow(&value))
                .and_then(|actual| self.settle(strategy, actual, &identity, mode)),
            Err(_elapsed) => Err(SnapCheckError::ArtifactTimeout {
                identity: identity.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
            .into()),
        };

        self.finish(&identity, start, result)
            .map(|outcome| Verification {
                identity,
                function: site.function.clone(),
                record_mode: mode,
                outcome,
            })
    }

    /// Boundary form of [`SnapshotEngine::verify`]: `None` passes, errors
    /// fold into the message
    pub fn verify_snapshot<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        value: &V,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> Option<String> {
        fold(self.verify(strategy, value, site, options))
    }

    /// Boundary form of [`SnapshotEngine::verify_async`]
    pub async fn verify_snapshot_async<V, F, T, Fut>(
        &self,
        strategy: &FormatStrategy<V, F>,
        future: Fut,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> Option<String>
    where
        V: ?Sized,
        T: Borrow<V>,
        Fut: Future<Output = T>,
    {
        fold(self.verify_async(strategy, future, site, options).await)
    }

    /// Verify one value under several strategies
    ///
    /// Each strategy gets its own identity: named entries use their name,
    /// unnamed ones the next ordinals. Failures are joined in order.
    pub fn verify_snapshots<V: ?Sized, F>(
        &self,
        strategies: &[(Option<&str>, &FormatStrategy<V, F>)],
        value: &V,
        site: &CallSite,
        options: &VerifyOptions,
    ) -> Option<String> {
        let failures: Vec<String> = strategies
            .iter()
            .filter_map(|(name, strategy)| {
                let mut options = options.clone();
                if let Some(name) = name {
                    options.name = Some((*name).to_string());
                }
                self.verify_snapshot(strategy, value, site, &options)
            })
            .collect();
        join_failures(failures)
    }

    fn begin(&self, identity: &SnapshotIdentity, mode: RecordMode) -> Instant {
        log_op_start!(
            OP_VERIFY_SNAPSHOT,
            snapshot_path = %identity.path().display(),
            record_mode = %mode
        );
        Instant::now()
    }

    fn finish(
        &self,
        identity: &SnapshotIdentity,
        start: Instant,
        result: Result<SnapshotOutcome>,
    ) -> Result<SnapshotOutcome> {
        let result = result.map_err(|err| err.with_identity(identity.to_string()));

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    OP_VERIFY_SNAPSHOT,
                    duration_ms = duration_ms,
                    snapshot_path = %identity.path().display(),
                    failed = outcome.is_failure()
                );
            }
            Err(err) => {
                log_op_error!(
                    OP_VERIFY_SNAPSHOT,
                    err.clone(),
                    duration_ms = duration_ms,
                    snapshot_path = %identity.path().display()
                );
            }
        }
        result
    }

    fn load_reference<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        identity: &SnapshotIdentity,
    ) -> Result<Option<Vec<u8>>> {
        if !self.references.exists(identity) {
            return Ok(None);
        }
        let bytes = self.references.read(identity)?;
        if strategy.is_empty_reference(&bytes) {
            tracing::debug!(
                snapshot_path = %identity.path().display(),
                "empty reference, recording again"
            );
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    fn settle<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        actual: F,
        identity: &SnapshotIdentity,
        mode: RecordMode,
    ) -> Result<SnapshotOutcome> {
        // `all` overwrites unconditionally, so the reference is never read.
        let reference = if mode == RecordMode::All {
            None
        } else {
            self.load_reference(strategy, identity)?
        };
        let exists = reference.is_some();

        let diff = match reference {
            Some(bytes) if needs_comparison(mode, exists) => {
                let reference = strategy.deserialize(&bytes);
                strategy.compare(&reference, &actual)
            }
            _ => None,
        };

        let action = decide(mode, exists, diff.is_some());
        tracing::debug!(
            snapshot_path = %identity.path().display(),
            record_mode = %mode,
            action = ?action,
            "snapshot decision"
        );

        match action {
            Action::Pass => Ok(SnapshotOutcome::Passed),
            Action::FailMissing => Ok(SnapshotOutcome::MissingReference {
                path: identity.path(),
            }),
            Action::FailMismatch => {
                let report = self.quarantine(strategy, &actual, identity, diff)?;
                Ok(SnapshotOutcome::Mismatch(report))
            }
            Action::Record(reason) => {
                // Quarantine first: the reference is about to be replaced.
                let mismatch = match diff {
                    Some(diff) => Some(self.quarantine(strategy, &actual, identity, Some(diff))?),
                    None => None,
                };
                let bytes = strategy.to_bytes(&actual)?;
                let path = self.references.write(identity, &bytes)?;
                Ok(SnapshotOutcome::Recorded {
                    path,
                    reason,
                    mismatch,
                })
            }
        }
    }

    /// Write failure artifacts for a mismatch
    ///
    /// The failing value is always quarantined under the reference's own
    /// extension unless the diff already carries a failure artifact. A write
    /// failure fails the assertion with the underlying I/O error.
    fn quarantine<V: ?Sized, F>(
        &self,
        strategy: &FormatStrategy<V, F>,
        actual: &F,
        identity: &SnapshotIdentity,
        diff: Option<DiffResult>,
    ) -> Result<MismatchReport> {
        let diff = diff.unwrap_or_else(|| DiffResult::new("Snapshot does not match reference."));
        let mut artifacts: Vec<PathBuf> = Vec::new();
        let mut failure_path = None;

        if diff.artifact(ArtifactKind::Failure).is_none() {
            let bytes = strategy.to_bytes(actual)?;
            let path = self.artifacts.write_artifact(
                identity,
                ArtifactKind::Failure,
                identity.extension.as_deref(),
                &bytes,
            )?;
            failure_path = Some(path.clone());
            artifacts.push(path);
        }

        for artifact in &diff.artifacts {
            let path = self.artifacts.write_artifact(
                identity,
                artifact.kind,
                Some(artifact.extension()),
                &artifact.bytes,
            )?;
            if artifact.kind == ArtifactKind::Failure {
                failure_path = Some(path.clone());
            }
            artifacts.push(path);
        }

        Ok(MismatchReport {
            message: diff.message,
            reference_path: identity.path(),
            failure_path,
            artifacts,
        })
    }
}

fn fold(result: Result<Verification>) -> Option<String> {
    match result {
        Ok(verification) => verification.failure_message(&effective_diff_tool()),
        Err(err) => Some(err.to_string()),
    }
}

/// Join several failure messages; `None` when there are none
pub fn join_failures(failures: Vec<String>) -> Option<String> {
    if failures.is_empty() {
        None
    } else {
        Some(failures.join("\n\n"))
    }
}

/// Configures an isolated [`SnapshotEngine`]
#[derive(Debug, Default)]
pub struct SnapshotEngineBuilder {
    artifacts_root: Option<PathBuf>,
    registry: Option<Arc<CounterRegistry>>,
}

impl SnapshotEngineBuilder {
    /// Root for failure artifacts instead of `SNAPSHOT_ARTIFACTS`/temp dir
    pub fn artifacts_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifacts_root = Some(root.into());
        self
    }

    /// Ordinal counters instead of the process-wide registry
    pub fn registry(mut self, registry: Arc<CounterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> SnapshotEngine {
        SnapshotEngine {
            resolver: IdentityResolver::new(self.registry.unwrap_or_else(CounterRegistry::global)),
            references: ReferenceStore::new(),
            artifacts: match self.artifacts_root {
                Some(root) => ArtifactStore::new(root),
                None => ArtifactStore::from_env(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_and_sync() {
        assert_send_sync::<SnapshotEngine>();
    }

    #[test]
    fn test_global_engine_is_shared() {
        assert!(std::ptr::eq(SnapshotEngine::global(), SnapshotEngine::global()));
    }

    #[test]
    fn test_builder_overrides_artifacts_root() {
        let engine = SnapshotEngine::builder().artifacts_root("/artifacts").build();
        assert_eq!(engine.artifacts_root(), std::path::Path::new("/artifacts"));
    }

    #[test]
    fn test_join_failures() {
        assert_eq!(join_failures(vec![]), None);
        assert_eq!(
            join_failures(vec!["a".to_string(), "b".to_string()]),
            Some("a\n\nb".to_string())
        );
    }
}
