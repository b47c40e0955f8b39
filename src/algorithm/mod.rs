//! Code aggregation and ICP scoring

pub mod aggregation;
pub mod scoring;
