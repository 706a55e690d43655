//! Dynamically scoped configuration stacks.
//!
//! Synchronous scopes live on a thread-local stack. Async scopes run their
//! future inside a task-local stack seeded with the enclosing effective
//! stack, so a future keeps its configuration wherever the runtime polls it.
//! A synchronous scope entered while a task-local stack is active pushes
//! onto that stack instead.

use std::cell::RefCell;
use std::future::Future;

use crate::config::SnapshotConfiguration;

thread_local! {
    static THREAD_STACK: RefCell<Vec<SnapshotConfiguration>> = const { RefCell::new(Vec::new()) };
}

tokio::task_local! {
    static TASK_STACK: RefCell<Vec<SnapshotConfiguration>>;
}

enum Target {
    Task,
    Thread,
}

/// Pops the pushed configuration, also on unwind
struct ScopeGuard {
    target: Target,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        match self.target {
            Target::Task => {
                let _ = TASK_STACK.try_with(|stack| stack.borrow_mut().pop());
            }
            Target::Thread => {
                let _ = THREAD_STACK.try_with(|stack| stack.borrow_mut().pop());
            }
        }
    }
}

fn push(configuration: SnapshotConfiguration) -> ScopeGuard {
    let mut pending = Some(configuration);
    let pushed_to_task = TASK_STACK
        .try_with(|stack| {
            if let Some(configuration) = pending.take() {
                stack.borrow_mut().push(configuration);
            }
        })
        .is_ok();
    if pushed_to_task {
        return ScopeGuard {
            target: Target::Task,
        };
    }
    if let Some(configuration) = pending {
        THREAD_STACK.with(|stack| stack.borrow_mut().push(configuration));
    }
    ScopeGuard {
        target: Target::Thread,
    }
}

/// Snapshot of the effective stack, outermost first
pub fn current_stack() -> Vec<SnapshotConfiguration> {
    TASK_STACK
        .try_with(|stack| stack.borrow().clone())
        .unwrap_or_else(|_| THREAD_STACK.with(|stack| stack.borrow().clone()))
}

/// Run `f` with `configuration` as the innermost scope
///
/// ```
/// use snapcheck_core::config::{current_configuration, with_snapshot_configuration, SnapshotConfiguration};
/// use snapcheck_core::record::RecordMode;
///
/// let mode = with_snapshot_configuration(SnapshotConfiguration::record(RecordMode::All), || {
///     current_configuration().record
/// });
/// assert_eq!(mode, Some(RecordMode::All));
/// assert_eq!(current_configuration().record, None);
/// ```
pub fn with_snapshot_configuration<R>(
    configuration: SnapshotConfiguration,
    f: impl FnOnce() -> R,
) -> R {
    let _guard = push(configuration);
    f()
}

/// Run `future` with `configuration` as the innermost scope
///
/// The future inherits every scope active where it is created.
pub async fn with_snapshot_configuration_async<Fut: Future>(
    configuration: SnapshotConfiguration,
    future: Fut,
) -> Fut::Output {
    let mut stack = current_stack();
    stack.push(configuration);
    TASK_STACK.scope(RefCell::new(stack), future).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::current_configuration;
    use crate::record::RecordMode;
    use std::time::Duration;

    #[test]
    fn test_nested_scopes_innermost_wins() {
        let outer = SnapshotConfiguration::record(RecordMode::Never)
            .with_timeout(Duration::from_secs(1));
        with_snapshot_configuration(outer, || {
            with_snapshot_configuration(SnapshotConfiguration::record(RecordMode::All), || {
                let effective = current_configuration();
                assert_eq!(effective.record, Some(RecordMode::All));
                assert_eq!(effective.timeout, Some(Duration::from_secs(1)));
            });
            assert_eq!(current_configuration().record, Some(RecordMode::Never));
        });
        assert!(current_stack().is_empty());
    }

    #[test]
    fn test_scope_pops_on_panic() {
        let result = std::panic::catch_unwind(|| {
            with_snapshot_configuration(SnapshotConfiguration::record(RecordMode::All), || {
                panic!("boom");
            })
        });
        assert!(result.is_err());
        assert!(current_stack().is_empty());
    }

    #[test]
    fn test_threads_do_not_share_scopes() {
        with_snapshot_configuration(SnapshotConfiguration::record(RecordMode::All), || {
            let other = std::thread::spawn(|| current_configuration().record)
                .join()
                .unwrap();
            assert_eq!(other, None);
        });
    }

    #[tokio::test]
    async fn test_async_scope_inherits_and_survives_await() {
        let outer = SnapshotConfiguration::record(RecordMode::Failed);
        let inner = SnapshotConfiguration::default().with_timeout(Duration::from_millis(50));

        let seen = with_snapshot_configuration_async(outer, async move {
            with_snapshot_configuration_async(inner, async {
                tokio::task::yield_now().await;
                current_configuration()
            })
            .await
        })
        .await;

        assert_eq!(seen.record, Some(RecordMode::Failed));
        assert_eq!(seen.timeout, Some(Duration::from_millis(50)));
        assert!(current_stack().is_empty());
    }

    #[tokio::test]
    async fn test_sync_scope_inside_task_pushes_onto_task_stack() {
        let seen = with_snapshot_configuration_async(
            SnapshotConfiguration::record(RecordMode::Never),
            async {
                let inner = with_snapshot_configuration(
                    SnapshotConfiguration::record(RecordMode::All),
                    current_configuration,
                );
                (inner.record, current_configuration().record)
            },
        )
        .await;
        assert_eq!(seen, (Some(RecordMode::All), Some(RecordMode::Never)));
    }
}
