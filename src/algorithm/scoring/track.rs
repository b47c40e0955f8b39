//! Track selection and segment correction

use crate::models::{OrgEnrichedRecord, ScoringTrack, SegmentLabel};

/// Organization-name keywords that put a record on the behavioral track
pub const BEHAVIORAL_KEYWORDS: [&str; 5] =
    ["BEHAVIORAL", "PSYCH", "MENTAL HEALTH", "COUNSELING", "THERAPY"];

/// Hospitals reporting less revenue than this are reclassified
pub const HOSPITAL_REVENUE_FLOOR: f64 = 10_000_000.0;

/// Pick the scoring track from the enrichment label and organization name
#[must_use]
pub fn detect_track(record: &OrgEnrichedRecord) -> ScoringTrack {
    if record.segment_label == SegmentLabel::BehavioralHealth {
        return ScoringTrack::Behavioral;
    }
    let name = record.org_name.to_uppercase();
    if BEHAVIORAL_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        return ScoringTrack::Behavioral;
    }
    match record.segment_label {
        SegmentLabel::HomeHealth | SegmentLabel::Hospital => ScoringTrack::PostAcute,
        _ => ScoringTrack::Ambulatory,
    }
}

/// Segment used for scoring and output
///
/// A hospital with known revenue under $10M is an ambulatory center.
#[must_use]
pub fn corrected_segment(record: &OrgEnrichedRecord) -> SegmentLabel {
    match (&record.segment_label, record.reported_revenue()) {
        (SegmentLabel::Hospital, Some(revenue)) if revenue < HOSPITAL_REVENUE_FLOOR => {
            SegmentLabel::AmbulatoryCenter
        }
        (segment, _) => segment.clone(),
    }
}
