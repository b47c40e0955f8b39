//! Pain labels and scoring drivers

use crate::algorithm::scoring::curves::{PSYCH_SEVERE_HIGH, PSYCH_SEVERE_LOW, UNDERCODING_NATIONAL_AVG};
use crate::algorithm::scoring::fit::FitScore;
use crate::algorithm::scoring::gate::SignalDecision;
use crate::algorithm::scoring::pain::PainScore;
use crate::algorithm::scoring::strategy::StrategyScore;
use crate::algorithm::scoring::text::percent0;
use crate::models::{OrgEnrichedRecord, PainLabel, ScoringTrack, SegmentLabel, VolumeUnit};

/// Pain total at which the pain signal becomes a driver
pub const PAIN_DRIVER_THRESHOLD: f64 = 25.0;
/// Undercoding pain reported as severe
pub const SEVERE_UNDERCODING_PAIN: f64 = 35.0;
/// Procedure pain that can label a record
pub const PROCEDURE_LABEL_POINTS: f64 = 3.0;
/// Volume score that earns the high-volume driver
pub const HIGH_VOLUME_POINTS: f64 = 12.0;
/// Sites above which a network is called multi-site
pub const MULTI_SITE_COUNT: f64 = 5.0;
/// Estimated revenue above which revenue is a driver
pub const STRONG_REVENUE: f64 = 5_000_000.0;

/// Which way a therapy ratio deviates from balanced coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TherapyDeviation {
    Under,
    Over,
    Other,
}

impl TherapyDeviation {
    fn of(psych_risk_ratio: f64) -> Self {
        if psych_risk_ratio <= PSYCH_SEVERE_LOW {
            Self::Under
        } else if psych_risk_ratio >= PSYCH_SEVERE_HIGH {
            Self::Over
        } else {
            Self::Other
        }
    }
}

/// Categorical pain label for a scored record
#[must_use]
pub fn pain_label(track: ScoringTrack, decision: &SignalDecision) -> PainLabel {
    let deviation = TherapyDeviation::of(decision.psych_risk_ratio);
    match track {
        ScoringTrack::PostAcute => PainLabel::MarginPressure,
        _ if decision.winning => PainLabel::LowPainStrongDocumentation,
        ScoringTrack::Behavioral if decision.therapy_dominates() => match deviation {
            TherapyDeviation::Under => PainLabel::TherapyUndercodingPain,
            TherapyDeviation::Over => PainLabel::AuditRiskPain,
            TherapyDeviation::Other => PainLabel::TherapyCodingRisk,
        },
        ScoringTrack::Behavioral => PainLabel::UndercodingPain,
        ScoringTrack::Ambulatory => {
            let procedure = decision.procedure.points;
            if procedure >= PROCEDURE_LABEL_POINTS
                && procedure >= decision.psych_risk.points
                && procedure >= decision.undercoding.points
            {
                PainLabel::ProcedureAlignmentPain
            } else if decision.therapy_dominates() {
                match deviation {
                    TherapyDeviation::Under => PainLabel::TherapyUndercodingPain,
                    TherapyDeviation::Over => PainLabel::TherapyAuditRisk,
                    TherapyDeviation::Other => PainLabel::TherapyCodingRisk,
                }
            } else {
                PainLabel::UndercodingPain
            }
        }
    }
}

/// Everything the driver list is derived from
#[derive(Debug, Clone, Copy)]
pub struct DriverInputs<'a> {
    pub record: &'a OrgEnrichedRecord,
    pub track: ScoringTrack,
    pub segment: &'a SegmentLabel,
    pub decision: &'a SignalDecision,
    pub pain: &'a PainScore,
    pub fit: &'a FitScore,
    pub strategy: &'a StrategyScore,
    pub volume_unit: VolumeUnit,
}

/// Ordered list of the factors that most influenced a score
#[must_use]
pub fn drivers(inputs: &DriverInputs<'_>) -> Vec<String> {
    let mut drivers = pain_drivers(inputs);

    if inputs.fit.breakdown.align >= 15.0 {
        match inputs.segment {
            SegmentLabel::Fqhc => drivers.push("FQHC - Core ICP".to_string()),
            SegmentLabel::UrgentCare => drivers.push("Urgent Care - High Fit".to_string()),
            _ => {}
        }
    } else if inputs.track == ScoringTrack::Behavioral {
        drivers.push("Behavioral Health - Core ICP".to_string());
    }

    let site_count = inputs.record.site_count.unwrap_or(1.0);
    if inputs.strategy.breakdown.volume >= HIGH_VOLUME_POINTS {
        drivers.push(format!(
            "High Volume ({}k {})",
            (inputs.strategy.used_volume / 1000.0).trunc(),
            inputs.volume_unit
        ));
    } else if site_count > MULTI_SITE_COUNT {
        drivers.push(format!("Multi-Site Network ({} sites)", site_count.trunc()));
    }

    if inputs.strategy.est_revenue > STRONG_REVENUE {
        drivers.push(format!(
            "Strong Rev (${:.1}M)",
            inputs.strategy.est_revenue / 1_000_000.0
        ));
    }
    if inputs.record.has_compliance_flag() {
        drivers.push("Compliance Flag".to_string());
    }
    if inputs.record.is_aco_participant {
        drivers.push("ACO Participant".to_string());
    }
    drivers
}

fn pain_drivers(inputs: &DriverInputs<'_>) -> Vec<String> {
    let decision = inputs.decision;
    let pain_total = inputs.pain.breakdown.total;
    if pain_total < PAIN_DRIVER_THRESHOLD {
        return vec![format!("{} Track: Benchmark", inputs.track)];
    }

    let ratio = decision.psych_risk_ratio;
    match inputs.track {
        ScoringTrack::Behavioral => {
            let driver = match TherapyDeviation::of(ratio) {
                TherapyDeviation::Under => format!("Therapy Undercoding ({ratio:.2})"),
                TherapyDeviation::Over => format!("Compliance/Audit Risk ({ratio:.2})"),
                TherapyDeviation::Other => format!("Therapy Coding Risk ({ratio:.2})"),
            };
            vec![driver]
        }
        ScoringTrack::PostAcute => {
            let driver = match inputs.record.net_margin {
                Some(margin) if margin < 0.0 => {
                    format!("Financial Distress (margin {:.1}%)", margin * 100.0)
                }
                Some(margin) => format!("Margin Pressure (margin {:.1}%)", margin * 100.0),
                None => "Margin Pressure".to_string(),
            };
            vec![driver]
        }
        ScoringTrack::Ambulatory => {
            let mut drivers = Vec::with_capacity(2);
            let procedure = &decision.procedure;
            if procedure.points >= PROCEDURE_LABEL_POINTS {
                if let (Some(target), Some(actual)) = (procedure.target, procedure.actual_ratio) {
                    drivers.push(format!(
                        "Procedure Alignment ({} vs {} expected)",
                        percent0(actual),
                        percent0(target.expected_ratio)
                    ));
                }
            }

            let undercoding = decision.undercoding_ratio;
            let signal = if decision.therapy_dominates() {
                match TherapyDeviation::of(ratio) {
                    TherapyDeviation::Under => format!("Therapy Undercoding ({ratio:.2})"),
                    TherapyDeviation::Over => format!("Therapy Audit Risk ({ratio:.2})"),
                    TherapyDeviation::Other => format!("Therapy Coding Risk ({ratio:.2})"),
                }
            } else if undercoding >= UNDERCODING_NATIONAL_AVG {
                format!("Strong E&M Documentation ({undercoding:.2})")
            } else if pain_total >= SEVERE_UNDERCODING_PAIN {
                format!("SEVERE Undercoding ({undercoding:.2})")
            } else {
                format!("E&M Undercoding ({undercoding:.2})")
            };
            drivers.push(signal);
            drivers
        }
    }
}
