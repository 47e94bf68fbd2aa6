//! Command orchestration layer.
//!
//! Each command wraps pure `apiscan-core` operations with boundary logging
//! (`log_op_start!` / `log_op_end!` / `log_op_error!`) and fans work out over
//! the rayon thread pool where artifacts or partitions are independent.

pub mod compare;
pub mod dependencies;
pub mod engine_command;
pub mod scan;
