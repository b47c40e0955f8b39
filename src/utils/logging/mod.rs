//! Logging utilities for pipeline runs
//!
//! Consistent start/finish messages for file operations and a spinner for
//! long chunked reads.

pub mod log;
pub mod progress;

pub use log::{log_degraded_source, log_operation_complete, log_operation_start};
pub use progress::{create_row_spinner, finish_progress_bar};
