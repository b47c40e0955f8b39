//! Standardized log lines for file operations.

use std::path::Path;
use std::time::Instant;

/// Log the start of an operation on a file
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation with the number of rows involved
///
/// # Arguments
/// * `operation` - Past-tense verb phrase, e.g. "read" or "wrote"
/// * `path` - File the rows came from or went to
/// * `rows` - Number of rows processed
/// * `started` - When the operation began
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, started: Instant) {
    log::info!(
        "Successfully {} {} rows ({}) in {:?}",
        operation,
        rows,
        path.display(),
        started.elapsed()
    );
}

/// Log that an optional source is unavailable and what the run does instead
pub fn log_degraded_source(source: &str, path: Option<&Path>, fallback: &str) {
    match path {
        Some(path) => log::warn!("{source} not found at {}; {fallback}", path.display()),
        None => log::warn!("{source} not configured; {fallback}"),
    }
}
