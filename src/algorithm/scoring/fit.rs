//! Fit (ICP alignment) sub-score

use crate::algorithm::scoring::curves::{round1, score_provider_count_continuous};
use crate::models::{FitBreakdown, OrgEnrichedRecord, ScoringTrack, SegmentLabel};

/// Cap on the behavioral value-based-care readiness bonus
pub const MAX_VBC_READINESS: f64 = 15.0;
/// Cap on the provider-count contribution on the behavioral track
pub const MAX_BEHAVIORAL_COMPLEXITY: f64 = 5.0;

/// Fit breakdown with its rationale
#[derive(Debug, Clone, PartialEq)]
pub struct FitScore {
    pub breakdown: FitBreakdown,
    pub reasoning: Vec<String>,
}

/// Fixed alignment points for a (corrected) segment
#[must_use]
pub fn segment_alignment(segment: &SegmentLabel) -> f64 {
    match segment {
        SegmentLabel::Fqhc | SegmentLabel::UrgentCare => 15.0,
        SegmentLabel::BehavioralHealth | SegmentLabel::PrivatePractice => 10.0,
        SegmentLabel::Hospital => 8.0,
        _ => 5.0,
    }
}

/// "HPSA", "MUA", "HPSA/MUA", or `None`
fn designation(record: &OrgEnrichedRecord) -> Option<&'static str> {
    match (record.is_hpsa, record.is_mua) {
        (true, true) => Some("HPSA/MUA"),
        (true, false) => Some("HPSA"),
        (false, true) => Some("MUA"),
        (false, false) => None,
    }
}

/// Score fit for the record's track against its corrected segment
#[must_use]
pub fn score_fit(record: &OrgEnrichedRecord, track: ScoringTrack, segment: &SegmentLabel) -> FitScore {
    let npi_count = record.npi_count.unwrap_or(1.0);
    match track {
        ScoringTrack::Behavioral => behavioral_fit(record, npi_count),
        _ => general_fit(record, segment, npi_count),
    }
}

fn behavioral_fit(record: &OrgEnrichedRecord, npi_count: f64) -> FitScore {
    let align = 10.0;
    let mut reasoning = vec!["+10pts: Behavioral Health - Core ICP segment".to_string()];

    let mut vbc: f64 = 0.0;
    match record.avg_mips_score {
        Some(mips) if mips > 80.0 => {
            vbc += 5.0;
            reasoning.push(format!("+5pts: MIPS {mips:.1} = VBC-ready tech infrastructure"));
        }
        Some(mips) if mips >= 60.0 => {
            vbc += 3.0;
            reasoning.push(format!("+3pts: MIPS {mips:.1} = moderate tech readiness"));
        }
        _ => {}
    }
    if record.is_aco_participant {
        vbc += 5.0;
        reasoning.push("+5pts: ACO participant = VBC experience".to_string());
    }
    if let Some(designation) = designation(record) {
        vbc += 5.0;
        reasoning.push(format!(
            "+5pts: {designation} = complex population, BHI opportunity"
        ));
    }
    let vbc = vbc.min(MAX_VBC_READINESS);

    let complexity = score_provider_count_continuous(npi_count);
    if complexity > 0.0 {
        reasoning.push(format!(
            "+{complexity:.1}pts: {} providers (operational capacity)",
            npi_count.trunc()
        ));
    }

    FitScore {
        breakdown: FitBreakdown {
            total: round1(align + vbc + complexity.min(MAX_BEHAVIORAL_COMPLEXITY)),
            align,
            complexity,
            vbc_readiness: vbc,
            ..FitBreakdown::default()
        },
        reasoning,
    }
}

fn general_fit(record: &OrgEnrichedRecord, segment: &SegmentLabel, npi_count: f64) -> FitScore {
    let align = segment_alignment(segment);
    let mut reasoning = vec![format!("+{align:.0}pts: {segment} alignment")];

    let complexity = score_provider_count_continuous(npi_count);
    if complexity > 0.0 {
        reasoning.push(format!("+{complexity:.1}pts: {} providers", npi_count.trunc()));
    }

    let mut tech_risk = 0.0;
    if record.is_aco_participant {
        tech_risk += 3.0;
        reasoning.push("+3pts: ACO participant".to_string());
    }
    if record.has_compliance_flag() {
        tech_risk += 2.0;
        reasoning.push("+2pts: Compliance flag".to_string());
    }

    let mips = match record.avg_mips_score {
        Some(score) if score > 80.0 => {
            reasoning.push(format!("+5pts: High MIPS quality ({score:.1})"));
            5.0
        }
        Some(score) if score < 50.0 => {
            reasoning.push(format!("+5pts: Distressed MIPS performer ({score:.1})"));
            5.0
        }
        _ => 0.0,
    };

    let hpsa_mua = match designation(record) {
        Some(designation) => {
            reasoning.push(format!("+5pts: {designation} designated area"));
            5.0
        }
        None => 0.0,
    };

    FitScore {
        breakdown: FitBreakdown {
            total: round1(align + complexity + tech_risk + mips + hpsa_mua),
            align,
            complexity,
            tech_risk,
            mips,
            hpsa_mua,
            vbc_readiness: 0.0,
        },
        reasoning,
    }
}
