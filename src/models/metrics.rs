//! Per-organization coding metrics produced by the aggregator

use std::fmt;

use arrow::datatypes::{DataType, Field, Schema};
use serde::{Serialize, Serializer};

use crate::common::traits::ArrowOutput;

/// Whether rows were rolled up to billing organizations
///
/// `Individual` means no reassignment bridge was available and each
/// rendering provider stands in for its own organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationLevel {
    Organization,
    Individual,
}

impl AggregationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Individual => "individual",
        }
    }
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AggregationLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One output row of the aggregator
///
/// Volumes are sums of a fractional service-count column, hence `f64`.
/// `count_level_3 + count_level_4_5 == total_eval_codes` always holds and
/// both ratios lie in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgCodeMetrics {
    #[serde(rename = "npi")]
    pub organization_id: u64,
    pub undercoding_ratio: f64,
    pub total_eval_codes: f64,
    pub count_level_3: f64,
    pub count_level_4_5: f64,
    pub total_procedure_codes: f64,
    pub procedure_ratio: f64,
    pub aggregation_level: AggregationLevel,
}

impl OrgCodeMetrics {
    /// Derive ratios from raw volumes
    ///
    /// The procedure ratio is 0 when there is no volume at all; the
    /// undercoding ratio is 0 when there is no evaluation volume.
    #[must_use]
    pub fn from_volumes(
        organization_id: u64,
        count_level_3: f64,
        count_level_4_5: f64,
        total_procedure_codes: f64,
        aggregation_level: AggregationLevel,
    ) -> Self {
        let total_eval_codes = count_level_3 + count_level_4_5;
        let undercoding_ratio = ratio(count_level_4_5, total_eval_codes);
        let procedure_ratio = ratio(
            total_procedure_codes,
            total_procedure_codes + total_eval_codes,
        );
        Self {
            organization_id,
            undercoding_ratio,
            total_eval_codes,
            count_level_3,
            count_level_4_5,
            total_procedure_codes,
            procedure_ratio,
            aggregation_level,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl ArrowOutput for OrgCodeMetrics {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("npi", DataType::UInt64, false),
            Field::new("undercoding_ratio", DataType::Float64, false),
            Field::new("total_eval_codes", DataType::Float64, false),
            Field::new("count_level_3", DataType::Float64, false),
            Field::new("count_level_4_5", DataType::Float64, false),
            Field::new("total_procedure_codes", DataType::Float64, false),
            Field::new("procedure_ratio", DataType::Float64, false),
            Field::new("aggregation_level", DataType::Utf8, false),
        ])
    }
}
