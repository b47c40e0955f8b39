//! Shared helpers for Arrow columns, output files and logging

pub mod arrow;
pub mod io;
pub mod logging;
