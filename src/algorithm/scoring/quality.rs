//! Data-quality accounting for procedure alignment
//!
//! Each scored row may yield one `DataQualityEvent`. Events are folded into
//! `DataQualityStats`, whose `merge` is an associative per-key sum so that
//! partial stats from parallel workers can be combined in any grouping.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// How well an assessed organization was covered by procedure data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageOutcome {
    HasData,
    MissingData,
    LowVolume,
}

/// One procedure-heavy organization seen by the alignment check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataQualityEvent {
    pub specialty: &'static str,
    pub outcome: CoverageOutcome,
}

/// Accumulated procedure-alignment coverage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityStats {
    pub procedure_heavy_specialties: u64,
    pub has_data: u64,
    pub missing_data: u64,
    pub low_volume: u64,
    pub by_specialty: BTreeMap<String, u64>,
    pub missing_by_specialty: BTreeMap<String, u64>,
}

/// Coverage for one specialty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyCoverage {
    pub specialty: String,
    pub total: u64,
    pub missing: u64,
    /// Share of organizations with procedure data, in `[0, 1]`
    pub coverage: f64,
}

impl DataQualityStats {
    /// Fold a sequence of events
    #[must_use]
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a DataQualityEvent>) -> Self {
        events.into_iter().fold(Self::default(), |mut stats, event| {
            stats.record(event);
            stats
        })
    }

    /// Count one event
    pub fn record(&mut self, event: &DataQualityEvent) {
        self.procedure_heavy_specialties += 1;
        *self.by_specialty.entry(event.specialty.to_string()).or_default() += 1;
        match event.outcome {
            CoverageOutcome::HasData => self.has_data += 1,
            CoverageOutcome::LowVolume => self.low_volume += 1,
            CoverageOutcome::MissingData => {
                self.missing_data += 1;
                *self
                    .missing_by_specialty
                    .entry(event.specialty.to_string())
                    .or_default() += 1;
            }
        }
    }

    /// Combine two partial accumulators by summing every counter
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.procedure_heavy_specialties += other.procedure_heavy_specialties;
        self.has_data += other.has_data;
        self.missing_data += other.missing_data;
        self.low_volume += other.low_volume;
        for (specialty, count) in other.by_specialty {
            *self.by_specialty.entry(specialty).or_default() += count;
        }
        for (specialty, count) in other.missing_by_specialty {
            *self.missing_by_specialty.entry(specialty).or_default() += count;
        }
        self
    }

    /// Per-specialty coverage, alphabetical by specialty
    #[must_use]
    pub fn coverage(&self) -> Vec<SpecialtyCoverage> {
        self.by_specialty
            .iter()
            .map(|(specialty, &total)| {
                let missing = self.missing_by_specialty.get(specialty).copied().unwrap_or(0);
                let coverage = if total > 0 {
                    (total - missing) as f64 / total as f64
                } else {
                    0.0
                };
                SpecialtyCoverage {
                    specialty: specialty.clone(),
                    total,
                    missing,
                    coverage,
                }
            })
            .collect()
    }

    /// Write the coverage report to the log
    pub fn log(&self) {
        if self.procedure_heavy_specialties == 0 {
            info!("No procedure-heavy specialties found");
            return;
        }
        let total = self.procedure_heavy_specialties;
        let share = |n: u64| n as f64 / total as f64 * 100.0;
        info!("Procedure-heavy specialties found: {total}");
        info!("  With procedure data: {} ({:.1}%)", self.has_data, share(self.has_data));
        info!("  Missing procedure data: {} ({:.1}%)", self.missing_data, share(self.missing_data));
        info!("  Low volume (<50 claims): {} ({:.1}%)", self.low_volume, share(self.low_volume));
        for row in self.coverage() {
            info!(
                "  {:20}: {:5} total | {:5} missing ({:5.1}% coverage)",
                row.specialty,
                row.total,
                row.missing,
                row.coverage * 100.0
            );
        }
        if self.missing_data > 0 {
            warn!(
                "{} procedure-heavy organizations lack procedure data; their alignment pain is undetected",
                self.missing_data
            );
        }
    }
}
