//! Utility functions for error handling
//!
//! Helpers that turn filesystem failures into `IcpError`s carrying the path
//! and the role the file plays in the run.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IcpError, Result};

/// Safely open a required input file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `role` - What the file is used for (e.g. "utilization"), used in errors
///
/// # Returns
/// * `Result<fs::File>` - The opened file, or `MissingInput` when it does not exist
pub fn safe_open_file(path: &Path, role: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(IcpError::missing_input(role, path));
    }

    if !path.is_file() {
        return Err(IcpError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Expected a file for {role} input"),
            ),
        ));
    }

    fs::File::open(path).map_err(|e| IcpError::io(path, e))
}

/// Create (or truncate) an output file, creating parent directories first
pub fn create_output_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| IcpError::io(parent, e))?;
        }
    }
    fs::File::create(path).map_err(|e| IcpError::io(path, e))
}
