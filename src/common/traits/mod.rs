//! Common traits used across the codebase
//!
//! Conversions between Arrow record batches and domain models.

pub mod adapter;

// Re-export adapter traits
pub use adapter::{ArrowOutput, RecordAdapter};
