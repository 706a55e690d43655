//! Canonical logging macros
//!
//! Every snapshot operation logs exactly one start and one end (or
//! end_error) event, keyed by the canonical `op` and `event` fields.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = snapcheck_core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use snapcheck_core::log_op_start;
/// log_op_start!("verify_snapshot");
/// log_op_start!("verify_snapshot", snapshot_path = "a/b.txt");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation; `duration_ms` comes first
///
/// ```
/// # use snapcheck_core::log_op_end;
/// log_op_end!("verify_snapshot", duration_ms = 3);
/// log_op_end!("write_reference", duration_ms = 3, bytes = 12usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log an operation error with its kind and stable code
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use snapcheck_core::log_op_error;
/// # use snapcheck_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Io).with_message("disk full");
/// log_op_error!("write_reference", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err.kind(),
            err_code = err.code(),
            $($($field)*,)?
            "{}",
            err
        )
    }};
}
