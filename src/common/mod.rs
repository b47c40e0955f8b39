//! Common utilities and traits
//!
//! Shared interfaces between the models and the readers/writers, kept here
//! to avoid circular dependencies.

pub mod traits;

// Re-export common traits for easier imports
pub use traits::*;
