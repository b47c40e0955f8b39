//! Arrow data handling utilities
//!
//! Helpers for pulling typed columns out of record batches, casting them to
//! the type a reader expects when the file stored something else.

pub mod array_utils;
pub mod extractors;

pub use array_utils::{downcast_array, get_column};
pub use extractors::{FlagColumn, NumberColumn, TextColumn};
