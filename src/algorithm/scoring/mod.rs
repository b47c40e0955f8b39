//! ICP scoring engine
//!
//! Each enriched organization is routed to a track, scored on pain, fit and
//! strategic value, and labeled. Rows are independent; the only cross-row
//! state is the procedure-alignment data-quality tally, which is returned
//! per row and merged after scoring.

pub mod curves;
pub mod fit;
pub mod gate;
pub mod labels;
pub mod pain;
pub mod procedure;
pub mod quality;
pub mod report;
pub mod strategy;
pub mod text;
pub mod track;

use log::info;
use rayon::prelude::*;

pub use gate::{SignalDecision, TherapyGate};
pub use quality::{CoverageOutcome, DataQualityEvent, DataQualityStats};
pub use report::ScoringSummary;

use crate::algorithm::scoring::curves::round1;
use crate::algorithm::scoring::fit::score_fit;
use crate::algorithm::scoring::labels::{DriverInputs, drivers, pain_label};
use crate::algorithm::scoring::pain::score_pain;
use crate::algorithm::scoring::strategy::score_strategy;
use crate::algorithm::scoring::track::{corrected_segment, detect_track};
use crate::models::{OrgEnrichedRecord, ScoreResult, Tier, VolumeUnit};

/// Composite score ceiling
pub const MAX_ICP_SCORE: f64 = 100.0;
/// Confidence ceiling
pub const MAX_CONFIDENCE: u32 = 100;

/// Score one organization
///
/// Never fails: missing inputs fall back to conservative defaults. The
/// second element is the procedure-alignment data-quality event, present
/// only when the record was assessed for procedure alignment.
#[must_use]
pub fn score_organization(record: &OrgEnrichedRecord) -> (ScoreResult, Option<DataQualityEvent>) {
    let track = detect_track(record);
    let segment = corrected_segment(record);
    let (decision, event) = SignalDecision::evaluate(record, track);

    let pain = score_pain(record, track, &decision);
    let fit = score_fit(record, track, &segment);
    let strategy = score_strategy(record, track, &segment);
    let volume_unit = VolumeUnit::from_source(record.volume_source.as_deref());

    let drivers = drivers(&DriverInputs {
        record,
        track,
        segment: &segment,
        decision: &decision,
        pain: &pain,
        fit: &fit,
        strategy: &strategy,
        volume_unit,
    });

    let icp_score = round1(pain.breakdown.total + fit.breakdown.total + strategy.breakdown.total)
        .min(MAX_ICP_SCORE);

    let result = ScoreResult {
        npi: record.npi.clone(),
        org_name: record.org_name.clone(),
        icp_score,
        tier: Tier::from_score(icp_score),
        segment_label: segment,
        fqhc_flag: record.fqhc_flag,
        track,
        pain_label: pain_label(track, &decision),
        data_confidence: pain.confidence.min(MAX_CONFIDENCE),
        drivers,
        pain: pain.breakdown,
        fit: fit.breakdown,
        strategy: strategy.breakdown,
        pain_reasoning: pain.reasoning,
        fit_reasoning: fit.reasoning,
        strategy_reasoning: strategy.reasoning,
        est_revenue: strategy.est_revenue,
        used_volume: strategy.used_volume,
        volume_unit,
    };
    (result, event)
}

/// Results of a batch scoring run
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOutput {
    /// Sorted by composite score, highest first; ties keep input order
    pub results: Vec<ScoreResult>,
    pub quality: DataQualityStats,
}

impl ScoringOutput {
    #[must_use]
    pub fn summary(&self) -> ScoringSummary {
        ScoringSummary::new(&self.results, &self.quality)
    }
}

/// Batch scorer over enriched organizations
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    parallel: bool,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ScoringEngine {
    #[must_use]
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Score every record and merge the data-quality tallies
    #[must_use]
    pub fn score_all(&self, records: &[OrgEnrichedRecord]) -> ScoringOutput {
        let (mut results, quality) = if self.parallel {
            info!(
                "Scoring {} organizations on {} threads",
                records.len(),
                rayon::current_num_threads()
            );
            let scored: Vec<(ScoreResult, Option<DataQualityEvent>)> =
                records.par_iter().map(score_organization).collect();
            let quality = scored
                .par_iter()
                .filter_map(|(_, event)| event.as_ref())
                .fold(DataQualityStats::default, |mut stats, event| {
                    stats.record(event);
                    stats
                })
                .reduce(DataQualityStats::default, DataQualityStats::merge);
            (scored.into_iter().map(|(result, _)| result).collect::<Vec<_>>(), quality)
        } else {
            info!("Scoring {} organizations sequentially", records.len());
            let mut quality = DataQualityStats::default();
            let results = records
                .iter()
                .map(|record| {
                    let (result, event) = score_organization(record);
                    if let Some(event) = &event {
                        quality.record(event);
                    }
                    result
                })
                .collect::<Vec<_>>();
            (results, quality)
        };

        results.sort_by(|a, b| b.icp_score.total_cmp(&a.icp_score));
        ScoringOutput { results, quality }
    }
}
