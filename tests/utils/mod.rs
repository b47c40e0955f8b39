use std::path::{Path, PathBuf};

use icp_score::models::claims::ServiceRecord;
use icp_score::models::{OrgEnrichedRecord, SegmentLabel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Codes drawn for synthetic utilization: target E&M codes, procedures, and
/// codes the aggregator ignores
pub const SYNTHETIC_CODES: [&str; 12] = [
    "99203", "99204", "99205", "99213", "99214", "99215", "11042", "20610", "69990", "99395",
    "G0008", "0001F",
];

/// Write a text fixture into the temp directory
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Deterministic synthetic utilization stream
#[must_use]
pub fn synthetic_services(rows: usize, providers: u64, seed: u64) -> Vec<ServiceRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|_| {
            let provider = 1_000_000_000 + rng.random_range(0..providers);
            let code = SYNTHETIC_CODES[rng.random_range(0..SYNTHETIC_CODES.len())];
            // fractional counts exercise floating-point summation order
            let count = f64::from(rng.random_range(1..400_u32)) + f64::from(rng.random_range(0..10_u32)) / 10.0;
            ServiceRecord::new(provider, code, count)
        })
        .collect()
}

/// Render service records as a utilization CSV
#[must_use]
pub fn utilization_csv(records: &[ServiceRecord]) -> String {
    let mut csv = String::from("Rndrng_NPI,Rndrng_Prvdr_Last_Org_Name,HCPCS_Cd,Tot_Srvcs\n");
    for record in records {
        csv.push_str(&format!(
            "{},SMITH,{},{}\n",
            record.provider_id, record.code, record.service_count
        ));
    }
    csv
}

/// An ambulatory practice with coding metrics set
#[must_use]
pub fn practice(npi: &str, undercoding: f64, psych_codes: f64, eval_codes: f64, psych_ratio: f64) -> OrgEnrichedRecord {
    let mut record = OrgEnrichedRecord::new(npi, "Riverside Family Medicine", SegmentLabel::MultiSpecialty);
    record.undercoding_ratio = Some(undercoding);
    record.total_psych_codes = Some(psych_codes);
    record.total_eval_codes = Some(eval_codes);
    record.psych_risk_ratio = Some(psych_ratio);
    record
}

/// A varied population covering every track and most signals
#[must_use]
pub fn synthetic_organizations(count: usize, seed: u64) -> Vec<OrgEnrichedRecord> {
    const SEGMENTS: [&str; 9] = [
        "FQHC",
        "Urgent Care",
        "Behavioral Health",
        "Private Practice",
        "Specialty Group",
        "Hospital",
        "Home Health",
        "Multi-specialty",
        "Ambulatory Center",
    ];
    const TAXONOMIES: [&str; 4] = ["213E00000X", "207X00000X", "207Q00000X", "207N00000X"];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let segment = SegmentLabel::parse(SEGMENTS[rng.random_range(0..SEGMENTS.len())]);
            let mut record = OrgEnrichedRecord::new(format!("{}", 1_500_000_000 + i), format!("Org {i}"), segment);
            if rng.random_bool(0.8) {
                record.undercoding_ratio = Some(rng.random_range(0.0..1.0));
            }
            let evals = f64::from(rng.random_range(0..5_000_u32));
            record.total_eval_codes = Some(evals);
            record.total_psych_codes = Some((evals * rng.random_range(0.0..1.0)).trunc());
            if rng.random_bool(0.6) {
                record.psych_risk_ratio = Some(rng.random_range(0.0..1.0));
            }
            record.taxonomy = Some(TAXONOMIES[rng.random_range(0..TAXONOMIES.len())].to_string());
            record.total_procedure_codes = Some(f64::from(rng.random_range(0..2_000_u32)));
            if rng.random_bool(0.7) {
                record.procedure_ratio = Some(rng.random_range(0.0..1.0));
            }
            if rng.random_bool(0.5) {
                record.total_revenue = Some(f64::from(rng.random_range(50_000..40_000_000_u32)));
            }
            record.services_count = Some(f64::from(rng.random_range(0..120_000_u32)));
            if rng.random_bool(0.5) {
                record.volume_source = Some("UDS".to_string());
            }
            if rng.random_bool(0.3) {
                record.net_margin = Some(rng.random_range(-0.2..0.2));
            }
            record.npi_count = Some(f64::from(rng.random_range(1..200_u32)));
            record.site_count = Some(f64::from(rng.random_range(1..20_u32)));
            record.is_aco_participant = rng.random_bool(0.2);
            record.oig_leie_flag = rng.random_bool(0.05);
            record.is_hpsa = rng.random_bool(0.3);
            if rng.random_bool(0.5) {
                record.avg_mips_score = Some(rng.random_range(0.0..100.0));
            }
            record
        })
        .collect()
}
