//! HPSA/MUA shortage-area designations joined onto organizations
//!
//! Records carrying a county are matched on (state, county). When no record
//! has a county the join falls back to state level: a record is designated
//! when any staging row for its state is.

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::common::traits::RecordAdapter;
use crate::error::Result;
use crate::models::OrgEnrichedRecord;
use crate::reader::{ColumnSelection, read_table};
use crate::utils::arrow::{FlagColumn, TextColumn};
use crate::utils::logging::{log_degraded_source, log_operation_complete, log_operation_start};

pub const STATE: &str = "state";
pub const COUNTY_NAME: &str = "county_name";
pub const IS_HPSA: &str = "is_hpsa";
pub const IS_MUA: &str = "is_mua";

/// Upper-cased, trimmed state code
#[must_use]
pub fn normalize_state(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Trimmed county name with each word capitalized
///
/// A letter is upper-cased when it follows a non-letter, so `o'brien`
/// becomes `O'Brien`.
#[must_use]
pub fn normalize_county(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Shortage-area flags for one area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Designation {
    pub is_hpsa: bool,
    pub is_mua: bool,
}

impl Designation {
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            is_hpsa: self.is_hpsa || other.is_hpsa,
            is_mua: self.is_mua || other.is_mua,
        }
    }
}

/// One row of the designation staging table
#[derive(Debug, Clone, PartialEq)]
pub struct DesignationRecord {
    pub state: String,
    pub county_name: Option<String>,
    pub designation: Designation,
}

impl RecordAdapter for DesignationRecord {
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let state = TextColumn::from_batch(batch, STATE, true)?;
        let county = TextColumn::from_batch(batch, COUNTY_NAME, false)?;
        let hpsa = FlagColumn::from_batch(batch, IS_HPSA, false)?;
        let mua = FlagColumn::from_batch(batch, IS_MUA, false)?;

        Ok((0..batch.num_rows())
            .filter_map(|row| {
                Some(Self {
                    state: normalize_state(state.get(row)?),
                    county_name: county.get(row).map(normalize_county),
                    designation: Designation {
                        is_hpsa: hpsa.get(row),
                        is_mua: mua.get(row),
                    },
                })
            })
            .collect())
    }
}

/// Designations by county and by state
#[derive(Debug, Clone, Default)]
pub struct DesignationTable {
    by_county: FxHashMap<(String, String), Designation>,
    hpsa_states: FxHashSet<String>,
    mua_states: FxHashSet<String>,
}

impl DesignationTable {
    /// Duplicate areas are merged with a logical OR
    #[must_use]
    pub fn from_records(records: &[DesignationRecord]) -> Self {
        let mut table = Self::default();
        for record in records {
            if let Some(county) = &record.county_name {
                let entry = table
                    .by_county
                    .entry((record.state.clone(), county.clone()))
                    .or_default();
                *entry = entry.union(record.designation);
            }
            if record.designation.is_hpsa {
                table.hpsa_states.insert(record.state.clone());
            }
            if record.designation.is_mua {
                table.mua_states.insert(record.state.clone());
            }
        }
        table
    }

    pub fn load(path: &Path, batch_size: usize) -> Result<Self> {
        let started = Instant::now();
        log_operation_start("Loading HPSA/MUA designations from", path);
        let batches = read_table(
            path,
            "HPSA/MUA",
            ColumnSelection::new(&[STATE], &[COUNTY_NAME, IS_HPSA, IS_MUA]),
            batch_size,
        )?;
        let records = DesignationRecord::from_record_batches(&batches)?;
        log_operation_complete("read", path, records.len(), started);
        Ok(Self::from_records(&records))
    }

    /// Designation of a county; undesignated when unknown
    #[must_use]
    pub fn county(&self, state: &str, county: &str) -> Designation {
        self.by_county
            .get(&(normalize_state(state), normalize_county(county)))
            .copied()
            .unwrap_or_default()
    }

    /// Whether any area of the state is designated
    #[must_use]
    pub fn state(&self, state: &str) -> Designation {
        let state = normalize_state(state);
        Designation {
            is_hpsa: self.hpsa_states.contains(&state),
            is_mua: self.mua_states.contains(&state),
        }
    }

    /// Set the flags on every record; returns how many are designated
    pub fn apply(&self, records: &mut [OrgEnrichedRecord]) -> usize {
        let county_level = records.iter().any(|r| r.county_name.is_some());
        if !county_level {
            log::info!("No county names on input; matching designations by state");
        }

        let mut designated = 0;
        for record in records.iter_mut() {
            let designation = match (&record.state_code, &record.county_name) {
                (Some(state), Some(county)) if county_level => self.county(state, county),
                (Some(state), _) if !county_level => self.state(state),
                _ => Designation::default(),
            };
            record.is_hpsa = designation.is_hpsa;
            record.is_mua = designation.is_mua;
            designated += usize::from(designation.is_hpsa || designation.is_mua);
        }
        designated
    }
}

/// Join shortage-area flags from `path`, clearing them when the file is absent
pub fn join_designations(records: &mut [OrgEnrichedRecord], path: &Path, batch_size: usize) -> Result<()> {
    if !path.exists() {
        log_degraded_source("HPSA/MUA staging table", Some(path), "shortage-area fit points disabled");
        for record in records.iter_mut() {
            record.is_hpsa = false;
            record.is_mua = false;
        }
        return Ok(());
    }

    let table = DesignationTable::load(path, batch_size)?;
    let designated = table.apply(records);
    log::info!("{designated} of {} organizations are in HPSA/MUA areas", records.len());
    Ok(())
}
