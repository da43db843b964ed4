//! Operation boundary macros
//!
//! Every engine operation logs exactly one `start` event and exactly one
//! `end` or `end_error` event. All three share the `component`, `op` and
//! `event` fields; extra fields are passed through to `tracing` unchanged.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use snapq_core::log_op_start;
/// log_op_start!("get_snapshots");
/// log_op_start!("repository_query", repository = "repo-a");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use snapq_core::log_op_end;
/// log_op_end!("get_snapshots", duration_ms = 42);
/// log_op_end!("repository_query", duration_ms = 3, returned = 10);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation.
///
/// `$err` is anything convertible into `ExError`; its kind, code and message
/// become `err_kind`, `err_code` and `err_message`.
///
/// ```
/// # use snapq_core::{log_op_error, errors::SnapqError};
/// let err = SnapqError::RepositoryMissing { repository: "r1".to_string() };
/// log_op_error!("get_snapshots", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message()
            $(, $($field)*)?
        )
    }};
}
