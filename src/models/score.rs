//! Scoring output: the per-organization score with its breakdowns

use std::fmt;

use arrow::datatypes::{DataType, Field, Schema};
use serde::{Serialize, Serializer};

use crate::common::traits::ArrowOutput;
use crate::models::organization::SegmentLabel;

/// Separator for multi-part text columns
pub const TEXT_SEPARATOR: &str = " | ";

macro_rules! serialize_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }
        )+
    };
}

/// Scoring path chosen for an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoringTrack {
    Behavioral,
    PostAcute,
    Ambulatory,
}

impl ScoringTrack {
    pub const ALL: [Self; 3] = [Self::Behavioral, Self::PostAcute, Self::Ambulatory];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Behavioral => "BEHAVIORAL",
            Self::PostAcute => "POST_ACUTE",
            Self::Ambulatory => "AMBULATORY",
        }
    }
}

/// Priority tier derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl Tier {
    pub const ALL: [Self; 4] = [Self::Tier1, Self::Tier2, Self::Tier3, Self::Tier4];

    /// Tier thresholds: 70, 50, 30
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Tier1
        } else if score >= 50.0 {
            Self::Tier2
        } else if score >= 30.0 {
            Self::Tier3
        } else {
            Self::Tier4
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3",
            Self::Tier4 => "Tier 4",
        }
    }
}

/// Categorical summary of the dominant pain signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PainLabel {
    LowPainStrongDocumentation,
    TherapyUndercodingPain,
    AuditRiskPain,
    TherapyAuditRisk,
    TherapyCodingRisk,
    ProcedureAlignmentPain,
    UndercodingPain,
    MarginPressure,
    #[default]
    EconomicPain,
}

impl PainLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowPainStrongDocumentation => "Low Pain - Strong Documentation",
            Self::TherapyUndercodingPain => "Therapy Undercoding Pain",
            Self::AuditRiskPain => "Audit Risk Pain",
            Self::TherapyAuditRisk => "Therapy Audit Risk",
            Self::TherapyCodingRisk => "Therapy Coding Risk",
            Self::ProcedureAlignmentPain => "Procedure Alignment Pain",
            Self::UndercodingPain => "Undercoding Pain",
            Self::MarginPressure => "Margin Pressure",
            Self::EconomicPain => "Economic Pain",
        }
    }

    /// Labels that attribute pain to therapy coding
    #[must_use]
    pub const fn is_therapy(self) -> bool {
        matches!(
            self,
            Self::TherapyUndercodingPain
                | Self::AuditRiskPain
                | Self::TherapyAuditRisk
                | Self::TherapyCodingRisk
        )
    }
}

/// Unit the used volume is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUnit {
    Patients,
    Encounters,
}

impl VolumeUnit {
    /// UDS sources count patients, everything else encounters
    #[must_use]
    pub fn from_source(source: Option<&str>) -> Self {
        match source {
            Some(source) if source.to_uppercase().contains("UDS") => Self::Patients,
            _ => Self::Encounters,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Encounters => "encounters",
        }
    }
}

serialize_as_str!(ScoringTrack, Tier, PainLabel, VolumeUnit);

/// Pain (urgency) sub-score and its components
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PainBreakdown {
    pub total: f64,
    pub undercoding: f64,
    /// Therapy pain after the relevance gate; the raw psych curve on the
    /// behavioral track
    pub therapy: f64,
    pub procedure: f64,
    pub margin: f64,
    pub psych_volume_bonus: f64,
}

/// Fit sub-score and its components
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitBreakdown {
    pub total: f64,
    pub align: f64,
    pub complexity: f64,
    pub tech_risk: f64,
    pub mips: f64,
    pub hpsa_mua: f64,
    /// Behavioral track only
    pub vbc_readiness: f64,
}

/// Strategic-value sub-score and its components
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrategyBreakdown {
    pub total: f64,
    pub revenue: f64,
    pub volume: f64,
}

/// The complete, immutable scoring result for one organization
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub npi: String,
    pub org_name: String,
    pub icp_score: f64,
    pub tier: Tier,
    /// Segment after revenue-based correction
    pub segment_label: SegmentLabel,
    pub fqhc_flag: bool,
    pub track: ScoringTrack,
    pub pain_label: PainLabel,
    pub data_confidence: u32,
    pub drivers: Vec<String>,
    pub pain: PainBreakdown,
    pub fit: FitBreakdown,
    pub strategy: StrategyBreakdown,
    pub pain_reasoning: Vec<String>,
    pub fit_reasoning: Vec<String>,
    pub strategy_reasoning: Vec<String>,
    pub est_revenue: f64,
    pub used_volume: f64,
    pub volume_unit: VolumeUnit,
}

impl ScoreResult {
    /// Drivers joined for display; `Standard` when none apply
    #[must_use]
    pub fn drivers_text(&self) -> String {
        if self.drivers.is_empty() {
            "Standard".to_string()
        } else {
            self.drivers.join(TEXT_SEPARATOR)
        }
    }
}

/// Flattened scoring output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub npi: String,
    pub org_name: String,
    pub icp_score: f64,
    pub icp_tier: Tier,
    pub segment_label: SegmentLabel,
    pub fqhc_flag: bool,
    pub scoring_track: ScoringTrack,
    pub pain_label: PainLabel,
    pub data_confidence: u32,
    pub scoring_drivers: String,
    pub score_pain_total: f64,
    pub score_pain_undercoding: f64,
    pub score_pain_therapy: f64,
    pub score_pain_procedure: f64,
    pub score_fit_total: f64,
    pub score_fit_align: f64,
    pub score_fit_complex: f64,
    pub score_fit_risk: f64,
    pub score_fit_mips: f64,
    pub score_fit_hpsa_mua: f64,
    pub score_strat_total: f64,
    pub score_strat_deal: f64,
    pub score_strat_expand: f64,
    pub metric_est_revenue: f64,
    pub metric_used_volume: f64,
    pub volume_unit: VolumeUnit,
    pub score_reasoning_pain: String,
    pub score_reasoning_fit: String,
    pub score_reasoning_strategy: String,
}

impl From<&ScoreResult> for ScoreRow {
    fn from(result: &ScoreResult) -> Self {
        Self {
            npi: result.npi.clone(),
            org_name: result.org_name.clone(),
            icp_score: result.icp_score,
            icp_tier: result.tier,
            segment_label: result.segment_label.clone(),
            fqhc_flag: result.fqhc_flag,
            scoring_track: result.track,
            pain_label: result.pain_label,
            data_confidence: result.data_confidence,
            scoring_drivers: result.drivers_text(),
            score_pain_total: result.pain.total,
            score_pain_undercoding: result.pain.undercoding,
            score_pain_therapy: result.pain.therapy,
            score_pain_procedure: result.pain.procedure,
            score_fit_total: result.fit.total,
            score_fit_align: result.fit.align,
            score_fit_complex: result.fit.complexity,
            score_fit_risk: result.fit.tech_risk,
            score_fit_mips: result.fit.mips,
            score_fit_hpsa_mua: result.fit.hpsa_mua,
            score_strat_total: result.strategy.total,
            score_strat_deal: result.strategy.revenue,
            score_strat_expand: result.strategy.volume,
            metric_est_revenue: result.est_revenue,
            metric_used_volume: result.used_volume,
            volume_unit: result.volume_unit,
            score_reasoning_pain: result.pain_reasoning.join(TEXT_SEPARATOR),
            score_reasoning_fit: result.fit_reasoning.join(TEXT_SEPARATOR),
            score_reasoning_strategy: result.strategy_reasoning.join(TEXT_SEPARATOR),
        }
    }
}

impl ArrowOutput for ScoreRow {
    fn schema() -> Schema {
        let text = |name: &str| Field::new(name, DataType::Utf8, false);
        let number = |name: &str| Field::new(name, DataType::Float64, false);
        Schema::new(vec![
            text("npi"),
            text("org_name"),
            number("icp_score"),
            text("icp_tier"),
            text("segment_label"),
            Field::new("fqhc_flag", DataType::Boolean, false),
            text("scoring_track"),
            text("pain_label"),
            Field::new("data_confidence", DataType::UInt32, false),
            text("scoring_drivers"),
            number("score_pain_total"),
            number("score_pain_undercoding"),
            number("score_pain_therapy"),
            number("score_pain_procedure"),
            number("score_fit_total"),
            number("score_fit_align"),
            number("score_fit_complex"),
            number("score_fit_risk"),
            number("score_fit_mips"),
            number("score_fit_hpsa_mua"),
            number("score_strat_total"),
            number("score_strat_deal"),
            number("score_strat_expand"),
            number("metric_est_revenue"),
            number("metric_used_volume"),
            text("volume_unit"),
            text("score_reasoning_pain"),
            text("score_reasoning_fit"),
            text("score_reasoning_strategy"),
        ])
    }
}
