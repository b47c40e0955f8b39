//! Code aggregation: utilization rows to per-organization coding metrics
//!
//! Rows are consumed chunk by chunk and folded into running per-organization
//! tallies in stream order, so the result does not depend on how the input
//! was chunked. `finish` pivots the tallies into `OrgCodeMetrics`.

pub mod bridge;
pub mod codes;
pub mod summary;

pub use bridge::ReassignmentBridge;
pub use codes::{CodeClass, EvalCode, EvalLevel, classify, is_procedure_code};
pub use summary::AggregationSummary;

use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::common::traits::RecordAdapter;
use crate::error::Result;
use crate::models::{AggregationLevel, OrgCodeMetrics, ServiceRecord};

/// Organizations with less evaluation volume than this are dropped
pub const MIN_EVAL_VOLUME: f64 = 10.0;

/// Running sums for one organization
#[derive(Debug, Clone, Default)]
struct OrgTally {
    eval_by_code: [f64; EvalCode::COUNT],
    procedures: f64,
    has_eval_rows: bool,
}

impl OrgTally {
    fn level_total(&self, level: EvalLevel) -> f64 {
        EvalCode::ALL
            .iter()
            .filter(|code| code.level() == level)
            .map(|code| self.eval_by_code[code.index()])
            .sum()
    }
}

/// Counters collected while aggregating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Utilization rows seen
    pub rows_processed: usize,
    /// Rows with a target evaluation code
    pub eval_rows: usize,
    /// Rows with a procedure code
    pub procedure_rows: usize,
    /// Evaluation or procedure rows credited to an organization via the bridge
    pub bridged_rows: usize,
    /// Evaluation or procedure rows with no bridge match
    pub unmatched_rows: usize,
    /// Organizations dropped for insufficient evaluation volume
    pub below_volume_floor: usize,
}

/// Final aggregator result
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutput {
    /// One row per organization, ascending by organization id
    pub metrics: Vec<OrgCodeMetrics>,
    pub stats: AggregationStats,
    pub level: AggregationLevel,
}

/// Streaming aggregator over utilization chunks
#[derive(Debug, Default)]
pub struct CodeAggregator {
    bridge: Option<ReassignmentBridge>,
    tallies: FxHashMap<u64, OrgTally>,
    stats: AggregationStats,
}

impl CodeAggregator {
    /// Create an aggregator; without a bridge each provider is its own
    /// organization
    #[must_use]
    pub fn new(bridge: Option<ReassignmentBridge>) -> Self {
        Self {
            bridge,
            tallies: FxHashMap::default(),
            stats: AggregationStats::default(),
        }
    }

    #[must_use]
    pub fn aggregation_level(&self) -> AggregationLevel {
        if self.bridge.is_some() {
            AggregationLevel::Organization
        } else {
            AggregationLevel::Individual
        }
    }

    /// Statistics so far
    #[must_use]
    pub fn stats(&self) -> AggregationStats {
        self.stats
    }

    /// Decode a record batch and fold it in
    pub fn process_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        let records = ServiceRecord::from_record_batch(batch)?;
        // Rows skipped by the adapter still count as processed
        self.stats.rows_processed += batch.num_rows() - records.len();
        self.process_chunk(&records);
        Ok(())
    }

    /// Fold one chunk of service records into the running tallies
    pub fn process_chunk(&mut self, records: &[ServiceRecord]) {
        for record in records {
            self.stats.rows_processed += 1;
            let Some(class) = classify(&record.code) else {
                continue;
            };
            match class {
                CodeClass::Evaluation(_) => self.stats.eval_rows += 1,
                CodeClass::Procedure => self.stats.procedure_rows += 1,
            }

            match &self.bridge {
                Some(bridge) => {
                    let organizations = bridge.organizations_for(record.provider_id);
                    if organizations.is_empty() {
                        self.stats.unmatched_rows += 1;
                        continue;
                    }
                    self.stats.bridged_rows += 1;
                    for &organization in organizations {
                        credit(&mut self.tallies, organization, class, record.service_count);
                    }
                }
                None => credit(&mut self.tallies, record.provider_id, class, record.service_count),
            }
        }
        debug!(
            "Aggregated chunk of {} rows; {} organizations so far",
            records.len(),
            self.tallies.len()
        );
    }

    /// Pivot the tallies into metrics, applying the volume floor
    #[must_use]
    pub fn finish(self) -> AggregationOutput {
        let level = self.aggregation_level();
        let mut stats = self.stats;

        if !self.tallies.values().any(|tally| tally.has_eval_rows) {
            warn!("No evaluation target codes found; output will be empty");
        }

        let mut metrics: Vec<OrgCodeMetrics> = self
            .tallies
            .into_iter()
            .filter(|(_, tally)| tally.has_eval_rows)
            .filter_map(|(organization, tally)| {
                let level_3 = tally.level_total(EvalLevel::Level3);
                let level_4_5 = tally.level_total(EvalLevel::Level4Or5);
                if level_3 + level_4_5 < MIN_EVAL_VOLUME {
                    stats.below_volume_floor += 1;
                    return None;
                }
                Some(OrgCodeMetrics::from_volumes(
                    organization,
                    level_3,
                    level_4_5,
                    tally.procedures,
                    level,
                ))
            })
            .collect();
        metrics.sort_unstable_by_key(|m| m.organization_id);

        AggregationOutput {
            metrics,
            stats,
            level,
        }
    }
}

fn credit(tallies: &mut FxHashMap<u64, OrgTally>, organization: u64, class: CodeClass, count: f64) {
    let tally = tallies.entry(organization).or_default();
    match class {
        CodeClass::Evaluation(code) => {
            tally.eval_by_code[code.index()] += count;
            tally.has_eval_rows = true;
        }
        CodeClass::Procedure => tally.procedures += count,
    }
}
