//! Claims-side input records
//!
//! Utilization rows and the two enrollment extracts used to bridge individual
//! providers to the organizations they bill through.

use arrow::record_batch::RecordBatch;

use crate::common::traits::RecordAdapter;
use crate::error::{IcpError, Result};
use crate::utils::arrow::{NumberColumn, TextColumn};

/// Rendering provider id in the utilization extract
pub const PROVIDER_ID: &str = "Rndrng_NPI";
/// HCPCS/CPT code in the utilization extract
pub const SERVICE_CODE: &str = "HCPCS_Cd";
/// Total services in the utilization extract
pub const SERVICE_COUNT: &str = "Tot_Srvcs";

/// Provider id in the enrollment extract
pub const ENROLLMENT_NPI: &str = "NPI";
/// Enrollment id in the enrollment extract
pub const ENROLLMENT_ID: &str = "ENRLMT_ID";
/// Enrollment id of the provider reassigning benefits
pub const REASSIGNOR_ENROLLMENT_ID: &str = "REASGN_BNFT_ENRLMT_ID";
/// Enrollment id of the organization receiving benefits
pub const RECIPIENT_ENROLLMENT_ID: &str = "RCV_BNFT_ENRLMT_ID";

/// Columns the aggregator reads from the utilization extract
pub const UTILIZATION_COLUMNS: [&str; 3] = [PROVIDER_ID, SERVICE_CODE, SERVICE_COUNT];

/// One utilization row: services billed by a provider under one code
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRecord {
    pub provider_id: u64,
    pub code: String,
    pub service_count: f64,
}

impl ServiceRecord {
    #[must_use]
    pub fn new(provider_id: u64, code: impl Into<String>, service_count: f64) -> Self {
        Self {
            provider_id,
            code: code.into(),
            service_count,
        }
    }
}

impl RecordAdapter for ServiceRecord {
    /// Rows with an empty service count contribute nothing and are skipped;
    /// a missing or malformed provider id fails the batch.
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let provider = TextColumn::from_batch(batch, PROVIDER_ID, true)?;
        let code = TextColumn::from_batch(batch, SERVICE_CODE, true)?;
        let count = NumberColumn::from_batch(batch, SERVICE_COUNT, true)?;

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let raw_id = provider.get(row).unwrap_or_default();
            let provider_id = parse_provider_id(PROVIDER_ID, raw_id)?;
            let Some(service_count) = count.get(row) else {
                continue;
            };
            records.push(Self {
                provider_id,
                code: code.get(row).unwrap_or_default().to_string(),
                service_count,
            });
        }
        Ok(records)
    }
}

/// Enrollment extract row mapping an enrollment id to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub enrollment_id: String,
    pub provider_id: u64,
}

impl RecordAdapter for EnrollmentRecord {
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let npi = TextColumn::from_batch(batch, ENROLLMENT_NPI, true)?;
        let enrollment = TextColumn::from_batch(batch, ENROLLMENT_ID, true)?;

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let (Some(raw_id), Some(enrollment_id)) = (npi.get(row), enrollment.get(row)) else {
                continue;
            };
            records.push(Self {
                enrollment_id: enrollment_id.to_string(),
                provider_id: parse_provider_id(ENROLLMENT_NPI, raw_id)?,
            });
        }
        Ok(records)
    }
}

/// Reassignment extract row: an individual enrollment billing through an
/// organization enrollment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentRecord {
    pub individual_enrollment_id: String,
    pub organization_enrollment_id: String,
}

impl RecordAdapter for ReassignmentRecord {
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let reassignor = TextColumn::from_batch(batch, REASSIGNOR_ENROLLMENT_ID, true)?;
        let recipient = TextColumn::from_batch(batch, RECIPIENT_ENROLLMENT_ID, true)?;

        Ok((0..batch.num_rows())
            .filter_map(|row| match (reassignor.get(row), recipient.get(row)) {
                (Some(individual), Some(organization)) => Some(Self {
                    individual_enrollment_id: individual.to_string(),
                    organization_enrollment_id: organization.to_string(),
                }),
                _ => None,
            })
            .collect())
    }
}

/// An individual provider resolved to the organization it bills through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReassignmentLink {
    pub individual_provider_id: u64,
    pub organization_provider_id: u64,
}

/// Parse a provider id cell
///
/// Integral floats (`1234567890.0`) are accepted since numeric columns may
/// have been widened on the way in.
pub fn parse_provider_id(column: &str, raw: &str) -> Result<u64> {
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < 1e18 => {
            Ok(value as u64)
        }
        _ => Err(IcpError::invalid_value(
            column,
            raw,
            "expected a numeric provider identifier",
        )),
    }
}
