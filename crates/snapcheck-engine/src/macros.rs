//! Assertion macros capturing the caller's location.
//!
//! Every macro resolves the call site where it is written, so unnamed
//! snapshots in one test function number `1, 2, 3, ...` in call order.

/// Assert that a value matches its reference, panicking with the failure
/// message otherwise
///
/// ```no_run
/// use snapcheck_engine::{assert_snapshot, VerifyOptions};
/// use snapcheck_engine::format::{json, lines};
///
/// assert_snapshot!("Line 1\nLine 2", lines());
/// assert_snapshot!(vec![1, 2, 3], json(), VerifyOptions::named("numbers"));
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($value:expr, $strategy:expr $(,)?) => {
        $crate::assert_snapshot!($value, $strategy, $crate::VerifyOptions::default())
    };
    ($value:expr, $strategy:expr, $options:expr $(,)?) => {
        if let Some(message) = $crate::verify_snapshot!($value, $strategy, $options) {
            panic!("{}", message);
        }
    };
}

/// Verify a value against its reference, returning the failure message
#[macro_export]
macro_rules! verify_snapshot {
    ($value:expr, $strategy:expr $(,)?) => {
        $crate::verify_snapshot!($value, $strategy, $crate::VerifyOptions::default())
    };
    ($value:expr, $strategy:expr, $options:expr $(,)?) => {
        $crate::SnapshotEngine::global().verify_snapshot(
            &$strategy,
            &$value,
            &$crate::__core::call_site!(),
            &$options,
        )
    };
}

/// Await an artifact and assert it matches its reference
///
/// Must be used inside an async context running on a tokio runtime.
#[macro_export]
macro_rules! assert_snapshot_async {
    ($future:expr, $strategy:expr $(,)?) => {
        $crate::assert_snapshot_async!($future, $strategy, $crate::VerifyOptions::default())
    };
    ($future:expr, $strategy:expr, $options:expr $(,)?) => {
        if let Some(message) = $crate::SnapshotEngine::global()
            .verify_snapshot_async(
                &$strategy,
                $future,
                &$crate::__core::call_site!(),
                &$options,
            )
            .await
        {
            panic!("{}", message);
        }
    };
}

/// Assert one value under several strategies
///
/// ```no_run
/// use snapcheck_engine::assert_snapshots;
/// use snapcheck_engine::format::{dump, json};
///
/// let user = vec!["Blob"];
/// assert_snapshots!(user, [json(), dump()]);
/// assert_snapshots!(user, { "as-json" => json(), "as-dump" => dump() });
/// ```
#[macro_export]
macro_rules! assert_snapshots {
    ($value:expr, [$($strategy:expr),+ $(,)?] $(,)?) => {{
        let value = &$value;
        let site = $crate::__core::call_site!();
        let options = $crate::VerifyOptions::default();
        let failures: ::std::vec::Vec<::std::string::String> = [
            $($crate::SnapshotEngine::global().verify_snapshot(&$strategy, value, &site, &options)),+
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some(message) = $crate::engine::join_failures(failures) {
            panic!("{}", message);
        }
    }};
    ($value:expr, {$($name:expr => $strategy:expr),+ $(,)?} $(,)?) => {{
        let value = &$value;
        let site = $crate::__core::call_site!();
        let failures: ::std::vec::Vec<::std::string::String> = [
            $($crate::SnapshotEngine::global().verify_snapshot(
                &$strategy,
                value,
                &site,
                &$crate::VerifyOptions::named($name),
            )),+
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some(message) = $crate::engine::join_failures(failures) {
            panic!("{}", message);
        }
    }};
}
