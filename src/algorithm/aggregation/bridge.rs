//! Individual-to-organization reassignment bridge
//!
//! Built from the enrollment extract (enrollment id to NPI) and the
//! reassignment extract (individual enrollment to organization enrollment)
//! by joining reassignments to enrollments twice.

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::common::traits::RecordAdapter;
use crate::error::Result;
use crate::models::claims::{
    ENROLLMENT_ID, ENROLLMENT_NPI, EnrollmentRecord, REASSIGNOR_ENROLLMENT_ID,
    RECIPIENT_ENROLLMENT_ID, ReassignmentLink, ReassignmentRecord,
};
use crate::reader::{ColumnSelection, read_table};
use crate::utils::logging::{log_degraded_source, log_operation_complete, log_operation_start};

/// Organizations per individual; almost always one
pub type OrganizationList = SmallVec<[u64; 2]>;

/// Lookup from an individual provider to the organizations it bills through
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassignmentBridge {
    links: FxHashMap<u64, OrganizationList>,
    link_count: usize,
}

impl ReassignmentBridge {
    /// Build from resolved links, collapsing duplicates
    #[must_use]
    pub fn from_links(links: impl IntoIterator<Item = ReassignmentLink>) -> Self {
        let mut map: FxHashMap<u64, OrganizationList> = FxHashMap::default();
        for link in links {
            map.entry(link.individual_provider_id)
                .or_default()
                .push(link.organization_provider_id);
        }
        let mut link_count = 0;
        for organizations in map.values_mut() {
            organizations.sort_unstable();
            organizations.dedup();
            link_count += organizations.len();
        }
        Self {
            links: map,
            link_count,
        }
    }

    /// Join reassignments to enrollments on both sides
    ///
    /// Reassignments whose individual or organization enrollment is unknown
    /// are dropped.
    #[must_use]
    pub fn from_records(enrollments: &[EnrollmentRecord], reassignments: &[ReassignmentRecord]) -> Self {
        let mut providers: FxHashMap<&str, SmallVec<[u64; 1]>> = FxHashMap::default();
        for enrollment in enrollments {
            providers
                .entry(enrollment.enrollment_id.as_str())
                .or_default()
                .push(enrollment.provider_id);
        }

        let links = reassignments.iter().flat_map(|reassignment| {
            let individuals = providers
                .get(reassignment.individual_enrollment_id.as_str())
                .map(SmallVec::as_slice)
                .unwrap_or_default();
            let organizations = providers
                .get(reassignment.organization_enrollment_id.as_str())
                .map(SmallVec::as_slice)
                .unwrap_or_default();
            individuals.iter().flat_map(move |&individual| {
                organizations.iter().map(move |&organization| ReassignmentLink {
                    individual_provider_id: individual,
                    organization_provider_id: organization,
                })
            })
        });

        Self::from_links(links)
    }

    /// Load both extracts and build the bridge
    ///
    /// Returns `Ok(None)` when either path is unset or does not exist; the
    /// caller then aggregates per individual provider.
    pub fn load(
        enrollment_path: Option<&Path>,
        reassignment_path: Option<&Path>,
        batch_size: usize,
    ) -> Result<Option<Self>> {
        let fallback = "aggregating per individual NPI";
        let (Some(enrollment_path), Some(reassignment_path)) = (enrollment_path, reassignment_path)
        else {
            log_degraded_source("Reassignment bridge", None, fallback);
            return Ok(None);
        };
        for path in [enrollment_path, reassignment_path] {
            if !path.exists() {
                log_degraded_source("Reassignment bridge source", Some(path), fallback);
                return Ok(None);
            }
        }

        let started = Instant::now();
        log_operation_start("Loading enrollment map from", enrollment_path);
        let batches = read_table(
            enrollment_path,
            "enrollment",
            ColumnSelection::new(&[ENROLLMENT_NPI, ENROLLMENT_ID], &[]),
            batch_size,
        )?;
        let enrollments = EnrollmentRecord::from_record_batches(&batches)?;

        log_operation_start("Loading reassignment map from", reassignment_path);
        let batches = read_table(
            reassignment_path,
            "reassignment",
            ColumnSelection::new(&[REASSIGNOR_ENROLLMENT_ID, RECIPIENT_ENROLLMENT_ID], &[]),
            batch_size,
        )?;
        let reassignments = ReassignmentRecord::from_record_batches(&batches)?;

        let bridge = Self::from_records(&enrollments, &reassignments);
        log_operation_complete("built bridge from", reassignment_path, bridge.len(), started);
        log::info!(
            "Bridge links {} individual NPIs to organizations ({} links)",
            bridge.individual_count(),
            bridge.len()
        );
        Ok(Some(bridge))
    }

    /// Organizations an individual provider bills through; empty when unknown
    #[must_use]
    pub fn organizations_for(&self, provider_id: u64) -> &[u64] {
        self.links
            .get(&provider_id)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct (individual, organization) links
    #[must_use]
    pub fn len(&self) -> usize {
        self.link_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link_count == 0
    }

    /// Number of individuals with at least one organization
    #[must_use]
    pub fn individual_count(&self) -> usize {
        self.links.len()
    }
}
