use icp_score::models::{OrgEnrichedRecord, PainLabel, ScoringTrack, SegmentLabel, Tier};
use icp_score::score_organization;

use crate::utils::practice;

#[test]
fn test_strong_documentation_scores_no_undercoding_pain() {
    let mut record = OrgEnrichedRecord::new("1", "Lakeside Internal Medicine", SegmentLabel::MultiSpecialty);
    record.total_eval_codes = Some(900.0);
    record.undercoding_ratio = Some(800.0 / 900.0);

    let (result, _) = score_organization(&record);
    assert_eq!(result.pain.undercoding, 0.0);
    assert!(result.pain_reasoning[0].contains("Strong E&M documentation (0.889)"));
}

#[test]
fn test_therapy_gate_closed_for_low_psych_volume() {
    let mut record = practice("1", 0.6, 10.0, 200.0, 0.2);
    record.segment_label = SegmentLabel::PrivatePractice;

    let (result, _) = score_organization(&record);
    assert_eq!(result.track, ScoringTrack::Ambulatory);
    assert_eq!(result.pain.therapy, 0.0);
    assert_eq!(result.pain.total, 0.0);
    assert_eq!(result.pain_label, PainLabel::UndercodingPain);
}

#[test]
fn test_behavioral_psych_pain_is_never_strong_documentation() {
    let mut record = practice("1", 0.6, 80.0, 200.0, 0.2);
    record.segment_label = SegmentLabel::BehavioralHealth;

    let (result, _) = score_organization(&record);
    assert_eq!(result.track, ScoringTrack::Behavioral);
    assert_eq!(result.pain.total, 40.0);
    assert_eq!(result.pain_label, PainLabel::UndercodingPain);
    assert_eq!(result.data_confidence, 40);
    assert_eq!(result.drivers[0], "Therapy Undercoding (0.20)");
}

#[test]
fn test_therapy_gate_open_dominates_undercoding() {
    let mut record = practice("1", 0.6, 100.0, 200.0, 0.2);
    record.segment_label = SegmentLabel::PrivatePractice;

    let (result, _) = score_organization(&record);
    assert_eq!(result.pain.therapy, 40.0);
    assert_eq!(result.pain.total, 40.0);
    assert_eq!(result.pain_label, PainLabel::TherapyUndercodingPain);
    assert!(result.pain_reasoning[0].ends_with("(therapy coding dominates)"));
    assert_eq!(result.drivers[0], "Therapy Undercoding (0.20)");
    assert_eq!(result.data_confidence, 50);
}

#[test]
fn test_hospital_segment_correction() {
    let mut small = OrgEnrichedRecord::new("1", "Mercy Regional", SegmentLabel::Hospital);
    small.total_revenue = Some(5_000_000.0);
    let (result, _) = score_organization(&small);
    assert_eq!(result.segment_label, SegmentLabel::AmbulatoryCenter);
    assert_eq!(result.segment_label.to_string(), "Ambulatory Center");

    let mut large = OrgEnrichedRecord::new("2", "Mercy Regional", SegmentLabel::Hospital);
    large.total_revenue = Some(25_000_000.0);
    let (result, _) = score_organization(&large);
    assert_eq!(result.segment_label, SegmentLabel::Hospital);
    assert_eq!(result.track, ScoringTrack::PostAcute);
    assert_eq!(result.pain_label, PainLabel::MarginPressure);
}

#[test]
fn test_podiatry_severe_procedure_deficit() {
    let mut record = OrgEnrichedRecord::new("1", "Foot & Ankle Associates", SegmentLabel::PrivatePractice);
    record.taxonomy = Some("213E00000X".to_string());
    record.undercoding_ratio = Some(0.6);
    record.total_eval_codes = Some(400.0);
    record.total_procedure_codes = Some(44.0);
    record.procedure_ratio = Some(0.10);

    let (result, event) = score_organization(&record);
    assert_eq!(result.pain.procedure, 10.0);
    assert_eq!(result.pain.total, 10.0);
    assert_eq!(result.pain_label, PainLabel::ProcedureAlignmentPain);
    assert!(
        result
            .pain_reasoning
            .iter()
            .any(|line| line == "+10.0pts: Severe procedure deficit: 10.0% vs expected 60.0%")
    );
    let event = event.unwrap();
    assert_eq!(event.specialty, "Podiatry");
}

#[test]
fn test_behavioral_track_by_name() {
    let mut record = OrgEnrichedRecord::new("1", "Northside Counseling Center", SegmentLabel::MultiSpecialty);
    record.psych_risk_ratio = Some(0.85);
    record.total_psych_codes = Some(1_200.0);
    record.total_eval_codes = Some(300.0);
    record.avg_mips_score = Some(85.0);
    record.npi_count = Some(12.0);

    let (result, event) = score_organization(&record);
    assert!(event.is_none());
    assert_eq!(result.track, ScoringTrack::Behavioral);
    assert_eq!(result.pain.total, 40.0);
    assert_eq!(result.pain_label, PainLabel::AuditRiskPain);
    assert_eq!(result.drivers[0], "Compliance/Audit Risk (0.85)");
    assert!(result.drivers.contains(&"Behavioral Health - Core ICP".to_string()));
    assert_eq!(result.fit_reasoning[0], "+10pts: Behavioral Health - Core ICP segment");
    assert_eq!(result.data_confidence, 40);
}

#[test]
fn test_sparse_record_gets_conservative_defaults() {
    let record = OrgEnrichedRecord::new("1", "", SegmentLabel::default());
    let (result, event) = score_organization(&record);

    assert!(event.is_none());
    assert_eq!(result.segment_label, SegmentLabel::MultiSpecialty);
    assert_eq!(result.pain.total, 10.0);
    assert_eq!(result.fit.total, 5.0);
    assert_eq!(result.strategy.total, 5.0);
    assert_eq!(result.icp_score, 20.0);
    assert_eq!(result.tier, Tier::Tier4);
    assert_eq!(result.data_confidence, 0);
    assert_eq!(result.drivers_text(), "AMBULATORY Track: Benchmark");
}
