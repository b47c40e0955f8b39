//! MIPS quality scores joined onto organizations by NPI

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::common::traits::RecordAdapter;
use crate::error::Result;
use crate::models::OrgEnrichedRecord;
use crate::reader::{ColumnSelection, read_table};
use crate::utils::arrow::{NumberColumn, TextColumn};
use crate::utils::logging::{log_degraded_source, log_operation_complete, log_operation_start};

pub const ORG_NPI: &str = "org_npi";
pub const AVG_MIPS_SCORE: &str = "avg_mips_score";
pub const MIPS_CLINICIAN_COUNT: &str = "mips_clinician_count";

/// Strip whitespace and a trailing `.0` left by float-typed NPI columns
#[must_use]
pub fn normalize_npi(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed)
}

/// One row of the MIPS staging table
#[derive(Debug, Clone, PartialEq)]
pub struct MipsRecord {
    pub org_npi: String,
    pub avg_mips_score: Option<f64>,
    pub mips_clinician_count: Option<f64>,
}

impl RecordAdapter for MipsRecord {
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let npi = TextColumn::from_batch(batch, ORG_NPI, true)?;
        let score = NumberColumn::from_batch(batch, AVG_MIPS_SCORE, false)?;
        let clinicians = NumberColumn::from_batch(batch, MIPS_CLINICIAN_COUNT, false)?;

        Ok((0..batch.num_rows())
            .filter_map(|row| {
                Some(Self {
                    org_npi: normalize_npi(npi.get(row)?).to_string(),
                    avg_mips_score: score.get(row),
                    mips_clinician_count: clinicians.get(row),
                })
            })
            .collect())
    }
}

/// MIPS scores keyed by organization NPI
#[derive(Debug, Clone, Default)]
pub struct MipsTable {
    by_npi: FxHashMap<String, MipsRecord>,
}

impl MipsTable {
    /// Later rows for the same NPI replace earlier ones
    #[must_use]
    pub fn from_records(records: Vec<MipsRecord>) -> Self {
        let by_npi = records
            .into_iter()
            .map(|record| (record.org_npi.clone(), record))
            .collect();
        Self { by_npi }
    }

    pub fn load(path: &Path, batch_size: usize) -> Result<Self> {
        let started = Instant::now();
        log_operation_start("Loading MIPS scores from", path);
        let batches = read_table(
            path,
            "MIPS",
            ColumnSelection::new(&[ORG_NPI], &[AVG_MIPS_SCORE, MIPS_CLINICIAN_COUNT]),
            batch_size,
        )?;
        let table = Self::from_records(MipsRecord::from_record_batches(&batches)?);
        log_operation_complete("read", path, table.len(), started);
        Ok(table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_npi.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_npi.is_empty()
    }

    #[must_use]
    pub fn get(&self, npi: &str) -> Option<&MipsRecord> {
        self.by_npi.get(normalize_npi(npi))
    }

    /// Left join onto the records; returns how many matched
    pub fn apply(&self, records: &mut [OrgEnrichedRecord]) -> usize {
        let mut matched = 0;
        for record in records.iter_mut() {
            let row = self.get(&record.npi);
            matched += usize::from(row.is_some());
            record.avg_mips_score = row.and_then(|r| r.avg_mips_score);
            record.mips_clinician_count = row.and_then(|r| r.mips_clinician_count);
        }
        matched
    }
}

/// Join MIPS scores from `path`, clearing them when the file is absent
pub fn join_mips(records: &mut [OrgEnrichedRecord], path: &Path, batch_size: usize) -> Result<()> {
    if !path.exists() {
        log_degraded_source("MIPS staging table", Some(path), "MIPS fit points disabled");
        for record in records.iter_mut() {
            record.avg_mips_score = None;
            record.mips_clinician_count = None;
        }
        return Ok(());
    }

    let table = MipsTable::load(path, batch_size)?;
    let matched = table.apply(records);
    log::info!("MIPS scores matched {matched} of {} organizations", records.len());
    Ok(())
}
