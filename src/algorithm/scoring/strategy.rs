//! Strategic-value (deal size) sub-score

use crate::algorithm::scoring::curves::{
    RevenueScale, VolumeScale, round1, score_revenue_continuous, score_volume_continuous,
};
use crate::algorithm::scoring::text::{millions, thousands};
use crate::models::{OrgEnrichedRecord, ScoringTrack, SegmentLabel, StrategyBreakdown};

/// Estimated dollars per encounter when no revenue is reported
#[must_use]
pub fn revenue_per_encounter(track: ScoringTrack, segment: &SegmentLabel) -> f64 {
    match (track, segment) {
        (ScoringTrack::Behavioral, _) => 150.0,
        (_, SegmentLabel::Fqhc) => 300.0,
        _ => 100.0,
    }
}

/// Strategy breakdown with its rationale and the figures it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyScore {
    pub breakdown: StrategyBreakdown,
    pub reasoning: Vec<String>,
    /// Reported revenue, or volume times the per-encounter estimate
    pub est_revenue: f64,
    pub used_volume: f64,
}

/// Score deal size and expansion potential
#[must_use]
pub fn score_strategy(record: &OrgEnrichedRecord, track: ScoringTrack, segment: &SegmentLabel) -> StrategyScore {
    let used_volume = record.used_volume();
    let verified = record.has_verified_volume();
    let est_revenue = record
        .reported_revenue()
        .unwrap_or_else(|| used_volume * revenue_per_encounter(track, segment));

    let (revenue_scale, volume_scale, suffix) = match (track, segment) {
        (ScoringTrack::Behavioral, _) => (
            RevenueScale::Behavioral,
            VolumeScale::Behavioral,
            " (behavioral thresholds)",
        ),
        (_, SegmentLabel::Fqhc) => (RevenueScale::Fqhc, VolumeScale::General, ""),
        _ => (RevenueScale::General, VolumeScale::General, ""),
    };

    let revenue = score_revenue_continuous(est_revenue, revenue_scale);
    let volume = score_volume_continuous(used_volume, volume_scale, verified);

    let mut reasoning = vec![format!(
        "+{revenue:.1}pts: {} revenue{suffix}",
        millions(est_revenue, 2)
    )];
    if used_volume > 0.0 {
        let label = if verified { "verified" } else { "estimated" };
        reasoning.push(format!(
            "+{volume:.1}pts: {} {label} volume{suffix}",
            thousands(used_volume)
        ));
    } else {
        reasoning.push(format!("+{volume:.1}pts: No volume data"));
    }

    StrategyScore {
        breakdown: StrategyBreakdown {
            total: round1(revenue + volume),
            revenue,
            volume,
        },
        reasoning,
        est_revenue,
        used_volume,
    }
}
