//! Progress reporting for long-running chunked reads, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Template for the row spinner
pub const ROW_SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}";

/// Create a spinner that counts processed rows
///
/// The spinner draws to stderr and is hidden automatically when stderr is
/// not a terminal.
#[must_use]
pub fn create_row_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(ROW_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
