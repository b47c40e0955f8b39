//! Enriched organization records consumed by the scoring engine

use std::fmt;

use arrow::record_batch::RecordBatch;
use serde::{Serialize, Serializer};

use crate::common::traits::RecordAdapter;
use crate::error::Result;
use crate::utils::arrow::{FlagColumn, NumberColumn, TextColumn};

/// Column names of the enriched organization table
pub mod columns {
    pub const NPI: &str = "npi";
    pub const ORG_NAME: &str = "org_name";
    pub const SEGMENT_LABEL: &str = "segment_label";
    pub const TAXONOMY: &str = "taxonomy";
    pub const FQHC_FLAG: &str = "fqhc_flag";
    pub const TOTAL_REVENUE: &str = "total_revenue";
    pub const HOSPITAL_TOTAL_REVENUE: &str = "hospital_total_revenue";
    pub const FQHC_REVENUE: &str = "fqhc_revenue";
    pub const HHA_REVENUE: &str = "hha_revenue";
    pub const REAL_MEDICARE_REVENUE: &str = "real_medicare_revenue";
    pub const SERVICES_COUNT: &str = "services_count";
    pub const FINAL_VOLUME: &str = "final_volume";
    pub const VOLUME_SOURCE: &str = "volume_source";
    pub const NPI_COUNT: &str = "npi_count";
    pub const SITE_COUNT: &str = "site_count";
    pub const IS_ACO_PARTICIPANT: &str = "is_aco_participant";
    pub const RISK_COMPLIANCE_FLAG: &str = "risk_compliance_flag";
    pub const OIG_LEIE_FLAG: &str = "oig_leie_flag";
    pub const IS_HPSA: &str = "is_hpsa";
    pub const IS_MUA: &str = "is_mua";
    pub const AVG_MIPS_SCORE: &str = "avg_mips_score";
    pub const MIPS_CLINICIAN_COUNT: &str = "mips_clinician_count";
    pub const UNDERCODING_RATIO: &str = "undercoding_ratio";
    pub const TOTAL_EVAL_CODES: &str = "total_eval_codes";
    pub const TOTAL_PROCEDURE_CODES: &str = "total_procedure_codes";
    pub const PROCEDURE_RATIO: &str = "procedure_ratio";
    pub const PSYCH_RISK_RATIO: &str = "psych_risk_ratio";
    pub const TOTAL_PSYCH_CODES: &str = "total_psych_codes";
    pub const NET_MARGIN: &str = "net_margin";
    pub const STATE_CODE: &str = "state_code";
    pub const COUNTY_NAME: &str = "county_name";

    /// Columns that must be present in the scoring input
    pub const REQUIRED: [&str; 1] = [NPI];

    /// Columns read when present
    pub const OPTIONAL: [&str; 30] = [
        ORG_NAME,
        SEGMENT_LABEL,
        TAXONOMY,
        FQHC_FLAG,
        TOTAL_REVENUE,
        HOSPITAL_TOTAL_REVENUE,
        FQHC_REVENUE,
        HHA_REVENUE,
        REAL_MEDICARE_REVENUE,
        SERVICES_COUNT,
        FINAL_VOLUME,
        VOLUME_SOURCE,
        NPI_COUNT,
        SITE_COUNT,
        IS_ACO_PARTICIPANT,
        RISK_COMPLIANCE_FLAG,
        OIG_LEIE_FLAG,
        IS_HPSA,
        IS_MUA,
        AVG_MIPS_SCORE,
        MIPS_CLINICIAN_COUNT,
        UNDERCODING_RATIO,
        TOTAL_EVAL_CODES,
        TOTAL_PROCEDURE_CODES,
        PROCEDURE_RATIO,
        PSYCH_RISK_RATIO,
        TOTAL_PSYCH_CODES,
        NET_MARGIN,
        STATE_CODE,
        COUNTY_NAME,
    ];
}

/// Descriptive organization segment assigned by enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SegmentLabel {
    Fqhc,
    Hospital,
    HomeHealth,
    PrivatePractice,
    BehavioralHealth,
    UrgentCare,
    AmbulatoryClinic,
    /// Enrichment's fallback label
    #[default]
    MultiSpecialty,
    SpecialtyGroup,
    /// Small hospital reclassified by revenue
    AmbulatoryCenter,
    /// Any label outside the known set; scored with default weights
    Other(String),
}

impl SegmentLabel {
    /// Parse a label, keeping unknown labels verbatim
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "FQHC" => Self::Fqhc,
            "Hospital" => Self::Hospital,
            "Home Health" => Self::HomeHealth,
            "Private Practice" => Self::PrivatePractice,
            "Behavioral Health" => Self::BehavioralHealth,
            "Urgent Care" => Self::UrgentCare,
            "Ambulatory Clinic" => Self::AmbulatoryClinic,
            "Multi-specialty" => Self::MultiSpecialty,
            "Specialty Group" => Self::SpecialtyGroup,
            "Ambulatory Center" => Self::AmbulatoryCenter,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fqhc => "FQHC",
            Self::Hospital => "Hospital",
            Self::HomeHealth => "Home Health",
            Self::PrivatePractice => "Private Practice",
            Self::BehavioralHealth => "Behavioral Health",
            Self::UrgentCare => "Urgent Care",
            Self::AmbulatoryClinic => "Ambulatory Clinic",
            Self::MultiSpecialty => "Multi-specialty",
            Self::SpecialtyGroup => "Specialty Group",
            Self::AmbulatoryCenter => "Ambulatory Center",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SegmentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One organization row of the scoring input
///
/// Numeric fields are `None` when the cell is missing or not a number;
/// flags are false unless the cell reads `true`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgEnrichedRecord {
    pub npi: String,
    pub org_name: String,
    pub segment_label: SegmentLabel,
    pub taxonomy: Option<String>,
    pub fqhc_flag: bool,

    pub total_revenue: Option<f64>,
    pub hospital_total_revenue: Option<f64>,
    pub fqhc_revenue: Option<f64>,
    pub hha_revenue: Option<f64>,
    pub real_medicare_revenue: Option<f64>,

    pub services_count: Option<f64>,
    pub final_volume: Option<f64>,
    pub volume_source: Option<String>,
    pub npi_count: Option<f64>,
    pub site_count: Option<f64>,

    pub is_aco_participant: bool,
    pub risk_compliance_flag: bool,
    pub oig_leie_flag: bool,
    pub is_hpsa: bool,
    pub is_mua: bool,
    pub avg_mips_score: Option<f64>,
    pub mips_clinician_count: Option<f64>,

    pub undercoding_ratio: Option<f64>,
    pub total_eval_codes: Option<f64>,
    pub total_procedure_codes: Option<f64>,
    pub procedure_ratio: Option<f64>,
    pub psych_risk_ratio: Option<f64>,
    pub total_psych_codes: Option<f64>,
    pub net_margin: Option<f64>,

    pub state_code: Option<String>,
    pub county_name: Option<String>,
}

impl OrgEnrichedRecord {
    /// Create a record with only identity and segment set
    #[must_use]
    pub fn new(npi: impl Into<String>, org_name: impl Into<String>, segment_label: SegmentLabel) -> Self {
        Self {
            npi: npi.into(),
            org_name: org_name.into(),
            segment_label,
            ..Self::default()
        }
    }

    /// First reported revenue in fallback order
    #[must_use]
    pub fn reported_revenue(&self) -> Option<f64> {
        self.total_revenue
            .or(self.hospital_total_revenue)
            .or(self.fqhc_revenue)
            .or(self.hha_revenue)
            .or(self.real_medicare_revenue)
    }

    /// Encounter volume: reported services when positive, else the
    /// estimated volume, else 0
    #[must_use]
    pub fn used_volume(&self) -> f64 {
        match self.services_count {
            Some(count) if count > 0.0 => count,
            _ => self.final_volume.unwrap_or(0.0),
        }
    }

    /// Whether the volume comes from a verified source
    #[must_use]
    pub fn has_verified_volume(&self) -> bool {
        self.volume_source.as_deref().is_some_and(|source| {
            let source = source.to_uppercase();
            ["UDS", "VERIFIED", "CLAIMS", "HRSA"]
                .iter()
                .any(|marker| source.contains(marker))
        })
    }

    /// Whether any compliance flag is raised
    #[must_use]
    pub fn has_compliance_flag(&self) -> bool {
        self.risk_compliance_flag || self.oig_leie_flag
    }
}

/// `fqhc_flag` arrives as `1`/`0` or `True`/`False` depending on the writer
fn parse_indicator(value: Option<&str>) -> bool {
    value.is_some_and(|value| {
        value.eq_ignore_ascii_case("true") || value.parse::<f64>().is_ok_and(|n| n != 0.0)
    })
}

impl RecordAdapter for OrgEnrichedRecord {
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        use columns as c;

        let npi = TextColumn::from_batch(batch, c::NPI, true)?;
        let org_name = TextColumn::from_batch(batch, c::ORG_NAME, false)?;
        let segment = TextColumn::from_batch(batch, c::SEGMENT_LABEL, false)?;
        let taxonomy = TextColumn::from_batch(batch, c::TAXONOMY, false)?;
        let fqhc_flag = TextColumn::from_batch(batch, c::FQHC_FLAG, false)?;
        let volume_source = TextColumn::from_batch(batch, c::VOLUME_SOURCE, false)?;
        let state_code = TextColumn::from_batch(batch, c::STATE_CODE, false)?;
        let county_name = TextColumn::from_batch(batch, c::COUNTY_NAME, false)?;

        let number = |name: &str| NumberColumn::from_batch(batch, name, false);
        let total_revenue = number(c::TOTAL_REVENUE)?;
        let hospital_total_revenue = number(c::HOSPITAL_TOTAL_REVENUE)?;
        let fqhc_revenue = number(c::FQHC_REVENUE)?;
        let hha_revenue = number(c::HHA_REVENUE)?;
        let real_medicare_revenue = number(c::REAL_MEDICARE_REVENUE)?;
        let services_count = number(c::SERVICES_COUNT)?;
        let final_volume = number(c::FINAL_VOLUME)?;
        let npi_count = number(c::NPI_COUNT)?;
        let site_count = number(c::SITE_COUNT)?;
        let avg_mips_score = number(c::AVG_MIPS_SCORE)?;
        let mips_clinician_count = number(c::MIPS_CLINICIAN_COUNT)?;
        let undercoding_ratio = number(c::UNDERCODING_RATIO)?;
        let total_eval_codes = number(c::TOTAL_EVAL_CODES)?;
        let total_procedure_codes = number(c::TOTAL_PROCEDURE_CODES)?;
        let procedure_ratio = number(c::PROCEDURE_RATIO)?;
        let psych_risk_ratio = number(c::PSYCH_RISK_RATIO)?;
        let total_psych_codes = number(c::TOTAL_PSYCH_CODES)?;
        let net_margin = number(c::NET_MARGIN)?;

        let flag = |name: &str| FlagColumn::from_batch(batch, name, false);
        let is_aco = flag(c::IS_ACO_PARTICIPANT)?;
        let risk_compliance = flag(c::RISK_COMPLIANCE_FLAG)?;
        let oig_leie = flag(c::OIG_LEIE_FLAG)?;
        let is_hpsa = flag(c::IS_HPSA)?;
        let is_mua = flag(c::IS_MUA)?;

        let owned = |column: &TextColumn, row: usize| column.get(row).map(str::to_string);

        Ok((0..batch.num_rows())
            .map(|row| Self {
                npi: npi.get(row).unwrap_or_default().to_string(),
                org_name: org_name.get(row).unwrap_or_default().to_string(),
                segment_label: segment.get(row).map(SegmentLabel::parse).unwrap_or_default(),
                taxonomy: owned(&taxonomy, row),
                fqhc_flag: parse_indicator(fqhc_flag.get(row)),
                total_revenue: total_revenue.get(row),
                hospital_total_revenue: hospital_total_revenue.get(row),
                fqhc_revenue: fqhc_revenue.get(row),
                hha_revenue: hha_revenue.get(row),
                real_medicare_revenue: real_medicare_revenue.get(row),
                services_count: services_count.get(row),
                final_volume: final_volume.get(row),
                volume_source: owned(&volume_source, row),
                npi_count: npi_count.get(row),
                site_count: site_count.get(row),
                is_aco_participant: is_aco.get(row),
                risk_compliance_flag: risk_compliance.get(row),
                oig_leie_flag: oig_leie.get(row),
                is_hpsa: is_hpsa.get(row),
                is_mua: is_mua.get(row),
                avg_mips_score: avg_mips_score.get(row),
                mips_clinician_count: mips_clinician_count.get(row),
                undercoding_ratio: undercoding_ratio.get(row),
                total_eval_codes: total_eval_codes.get(row),
                total_procedure_codes: total_procedure_codes.get(row),
                procedure_ratio: procedure_ratio.get(row),
                psych_risk_ratio: psych_risk_ratio.get(row),
                total_psych_codes: total_psych_codes.get(row),
                net_margin: net_margin.get(row),
                state_code: owned(&state_code, row),
                county_name: owned(&county_name, row),
            })
            .collect())
    }
}
