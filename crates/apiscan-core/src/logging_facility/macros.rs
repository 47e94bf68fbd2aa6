//! Boundary logging macros.
//!
//! Each macro stamps `component`, `op` and `event`; extra `key = value`
//! fields follow. Engine operations call exactly one start and one end (or
//! end_error) per invocation.

/// Start of an operation.
///
/// ```
/// # use apiscan_core::log_op_start;
/// log_op_start!("scan_artifact");
/// log_op_start!("scan_artifact", artifact = "lib-1.0");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Successful end of an operation, with its duration.
///
/// ```
/// # use apiscan_core::log_op_end;
/// log_op_end!("compare_snapshots", duration_ms = 3_u64, change_count = 12_usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Failed end of an operation. `$err` is anything convertible into
/// [`ExError`](crate::errors::ExError); its kind and stable code are logged.
///
/// ```
/// # use apiscan_core::log_op_error;
/// # use apiscan_core::errors::ApiScanError;
/// let err = ApiScanError::DuplicateEntity { key: "com.acme.Widget".to_string() };
/// log_op_error!("scan_artifact", err, duration_ms = 1_u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
