//! Procedure alignment for procedure-heavy specialties
//!
//! Specialty practices that bill far fewer procedures than their specialty
//! norm are flagged. Coverage of the check is reported as data-quality
//! events instead of being tracked globally.

use crate::algorithm::scoring::curves::round1;
use crate::algorithm::scoring::quality::{CoverageOutcome, DataQualityEvent};
use crate::algorithm::scoring::text::percent1;
use crate::models::{OrgEnrichedRecord, SegmentLabel};

/// Expected procedure share for a taxonomy prefix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialtyTarget {
    pub taxonomy_prefix: &'static str,
    pub specialty: &'static str,
    /// Procedures / (procedures + evaluation codes)
    pub expected_ratio: f64,
}

const fn target(taxonomy_prefix: &'static str, specialty: &'static str, expected_ratio: f64) -> SpecialtyTarget {
    SpecialtyTarget {
        taxonomy_prefix,
        specialty,
        expected_ratio,
    }
}

/// Procedure-heavy specialties, matched in order
pub const SPECIALTY_TARGETS: [SpecialtyTarget; 9] = [
    target("213E", "Podiatry", 0.60),
    target("207X", "Orthopedics", 0.50),
    target("207W", "Ophthalmology", 0.60),
    target("207N", "Dermatology", 0.50),
    target("204C", "Sports Medicine", 0.40),
    target("204D", "Surgical Oncology", 0.40),
    target("208200", "Plastic Surgery", 0.40),
    target("207V", "General Surgery", 0.50),
    target("207T", "Pain Medicine", 0.45),
];

/// Claims needed before the ratio is trusted
pub const MIN_CLAIM_VOLUME: f64 = 50.0;
/// Deficit below which nothing is flagged
pub const DEFICIT_THRESHOLD: f64 = 0.20;
/// Deficit at which pain is maximal
pub const SEVERE_DEFICIT: f64 = 0.40;

/// Match a semicolon-separated taxonomy string against the specialty table
///
/// Codes are tried in the order they appear; the first code matching any
/// prefix wins.
#[must_use]
pub fn match_specialty(taxonomy: Option<&str>) -> Option<&'static SpecialtyTarget> {
    taxonomy?
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .find_map(|code| {
            SPECIALTY_TARGETS
                .iter()
                .find(|target| code.starts_with(target.taxonomy_prefix))
        })
}

/// Outcome of the procedure alignment check
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcedureAlignment {
    pub points: f64,
    pub reason: Option<String>,
    pub target: Option<&'static SpecialtyTarget>,
    pub actual_ratio: Option<f64>,
}

impl ProcedureAlignment {
    /// The check does not apply to this organization
    #[must_use]
    pub fn not_applicable() -> Self {
        Self::default()
    }
}

/// Score procedure alignment pain
///
/// Only private practices and specialty groups with a procedure-heavy
/// taxonomy are assessed. Returns the data-quality event for every assessed
/// organization.
#[must_use]
pub fn score_procedure_alignment(record: &OrgEnrichedRecord) -> (ProcedureAlignment, Option<DataQualityEvent>) {
    if !matches!(
        record.segment_label,
        SegmentLabel::PrivatePractice | SegmentLabel::SpecialtyGroup
    ) {
        return (ProcedureAlignment::not_applicable(), None);
    }
    let Some(target) = match_specialty(record.taxonomy.as_deref()) else {
        return (ProcedureAlignment::not_applicable(), None);
    };
    let event = |outcome| {
        Some(DataQualityEvent {
            specialty: target.specialty,
            outcome,
        })
    };
    let assessed = ProcedureAlignment {
        target: Some(target),
        ..ProcedureAlignment::default()
    };

    let claims = record.total_procedure_codes.unwrap_or(0.0) + record.total_eval_codes.unwrap_or(0.0);
    if claims < MIN_CLAIM_VOLUME {
        return (assessed, event(CoverageOutcome::LowVolume));
    }
    let Some(actual) = record.procedure_ratio else {
        return (assessed, event(CoverageOutcome::MissingData));
    };

    let expected = target.expected_ratio;
    let deficit = expected - actual;
    let comparison = format!("{} vs expected {}", percent1(actual), percent1(expected));
    let (points, reason) = if deficit >= SEVERE_DEFICIT {
        (10.0, Some(format!("Severe procedure deficit: {comparison}")))
    } else if deficit >= DEFICIT_THRESHOLD {
        let points = round1(4.0 + (deficit - DEFICIT_THRESHOLD) / (SEVERE_DEFICIT - DEFICIT_THRESHOLD) * 6.0);
        (points, Some(format!("Procedure deficit: {comparison}")))
    } else {
        (0.0, None)
    };

    (
        ProcedureAlignment {
            points,
            reason,
            target: Some(target),
            actual_ratio: Some(actual),
        },
        event(CoverageOutcome::HasData),
    )
}
