//! Configuration for aggregation and scoring runs.

use std::path::{Path, PathBuf};

use crate::error::{IcpError, Result};

/// Default number of utilization rows decoded per chunk
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Environment variable overriding the chunk size
pub const BATCH_SIZE_ENV: &str = "ICP_BATCH_SIZE";

/// Helper function to get batch size from environment
#[must_use]
pub fn batch_size_from_env() -> Option<usize> {
    std::env::var(BATCH_SIZE_ENV)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Configuration for the code aggregation run
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Provider-by-service utilization extract
    pub utilization_path: PathBuf,
    /// Enrollment extract mapping enrollment ids to NPIs
    pub enrollment_path: Option<PathBuf>,
    /// Reassignment extract linking individual to organization enrollments
    pub reassignment_path: Option<PathBuf>,
    /// Where the per-organization metrics are written
    pub output_path: PathBuf,
    /// Rows per chunk; affects memory only
    pub batch_size: usize,
}

impl AggregationConfig {
    /// Create a configuration with no bridge sources
    #[must_use]
    pub fn new(utilization_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            utilization_path: utilization_path.into(),
            enrollment_path: None,
            reassignment_path: None,
            output_path: output_path.into(),
            batch_size: batch_size_from_env().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }

    /// Set both bridge sources
    #[must_use]
    pub fn with_bridge(
        mut self,
        enrollment_path: impl Into<PathBuf>,
        reassignment_path: impl Into<PathBuf>,
    ) -> Self {
        self.enrollment_path = Some(enrollment_path.into());
        self.reassignment_path = Some(reassignment_path.into());
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IcpError::Config("batch size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the scoring run
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Enriched organization table
    pub input_path: PathBuf,
    /// Optional MIPS staging table
    pub mips_path: Option<PathBuf>,
    /// Optional HPSA/MUA staging table
    pub designation_path: Option<PathBuf>,
    /// Where the scored table is written
    pub output_path: PathBuf,
    /// Optional JSON dump of procedure-alignment data quality
    pub quality_report_path: Option<PathBuf>,
    /// Score rows on the rayon pool
    pub parallel: bool,
    /// Rows per decoded batch of the input table
    pub batch_size: usize,
}

impl ScoringConfig {
    #[must_use]
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            mips_path: None,
            designation_path: None,
            output_path: output_path.into(),
            quality_report_path: None,
            parallel: true,
            batch_size: batch_size_from_env().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }

    #[must_use]
    pub fn with_mips(mut self, path: impl Into<PathBuf>) -> Self {
        self.mips_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_designations(mut self, path: impl Into<PathBuf>) -> Self {
        self.designation_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_quality_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.quality_report_path = Some(path.into());
        self
    }

    /// Score rows one after another instead of on the rayon pool
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IcpError::Config("batch size must be positive".to_string()));
        }
        if self.input_path == self.output_path {
            return Err(IcpError::Config(format!(
                "output would overwrite input {}",
                self.input_path.display()
            )));
        }
        Ok(())
    }
}

/// Output encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// `.parquet` files are Parquet, anything else is CSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Self::Parquet,
            _ => Self::Csv,
        }
    }
}
