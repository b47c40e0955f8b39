//! Staging-table joins applied to the scoring input
//!
//! Each join is optional. A configured table that does not exist degrades
//! its columns to defaults with a warning instead of failing the run.

pub mod designations;
pub mod mips;

pub use designations::{Designation, DesignationTable, join_designations};
pub use mips::{MipsTable, join_mips};

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::models::OrgEnrichedRecord;

/// Apply every staging join the configuration names
pub fn apply_staging(records: &mut [OrgEnrichedRecord], config: &ScoringConfig) -> Result<()> {
    if let Some(path) = &config.mips_path {
        join_mips(records, path, config.batch_size)?;
    }
    if let Some(path) = &config.designation_path {
        join_designations(records, path, config.batch_size)?;
    }
    Ok(())
}
