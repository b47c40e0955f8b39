use icp_score::models::AggregationLevel;
use icp_score::{AggregationConfig, run_aggregation};

use crate::utils::write_fixture;

const UTILIZATION: &str = "Rndrng_NPI,HCPCS_Cd,Tot_Srvcs\n\
    1000000001,99213,30\n\
    1000000001,99214,10\n\
    1000000001,99215,10\n\
    1000000001,11042,50\n\
    1000000002,99213,5\n\
    1000000002,99214,4\n\
    1000000003,99203,20\n\
    1000000003,G0008,100\n\
    1000000003,0001F,7\n";

const ENROLLMENT: &str = "NPI,ENRLMT_ID\n\
    1000000001,I1\n\
    1000000003,I3\n\
    2000000001,O1\n";

const REASSIGNMENT: &str = "REASGN_BNFT_ENRLMT_ID,RCV_BNFT_ENRLMT_ID\n\
    I1,O1\n\
    I3,O1\n\
    I9,O1\n";

#[test]
fn test_missing_bridge_falls_back_to_individuals() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "utilization.csv", UTILIZATION);
    let output = dir.path().join("metrics.csv");

    let config = AggregationConfig::new(&input, &output)
        .with_bridge(dir.path().join("absent_enrollment.csv"), dir.path().join("absent_reassignment.csv"));
    let (result, summary) = run_aggregation(&config).unwrap();

    assert_eq!(result.level, AggregationLevel::Individual);
    let ids: Vec<u64> = result.metrics.iter().map(|m| m.organization_id).collect();
    // provider 2 has only 9 evaluation services
    assert_eq!(ids, vec![1_000_000_001, 1_000_000_003]);
    assert_eq!(result.stats.below_volume_floor, 1);
    assert!(result.metrics.iter().all(|m| m.aggregation_level == AggregationLevel::Individual));

    let first = &result.metrics[0];
    assert_eq!(first.count_level_3, 30.0);
    assert_eq!(first.count_level_4_5, 20.0);
    assert_eq!(first.undercoding_ratio, 0.4);
    assert_eq!(first.procedure_ratio, 0.5);

    let second = &result.metrics[1];
    assert_eq!(second.undercoding_ratio, 0.0);
    assert_eq!(second.total_procedure_codes, 0.0);
    assert_eq!(second.procedure_ratio, 0.0);

    assert_eq!(summary.organizations, 2);
    assert_eq!(summary.severe_undercoding, 1);
    assert_eq!(summary.moderate_undercoding, 1);
    assert_eq!(summary.with_procedures, 1);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.lines().skip(1).all(|line| line.ends_with(",individual")));
}

#[test]
fn test_bridge_rolls_up_to_organizations() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "utilization.csv", UTILIZATION);
    let enrollment = write_fixture(dir.path(), "enrollment.csv", ENROLLMENT);
    let reassignment = write_fixture(dir.path(), "reassignment.csv", REASSIGNMENT);
    let output = dir.path().join("metrics.csv");

    let config = AggregationConfig::new(&input, &output).with_bridge(&enrollment, &reassignment);
    let (result, _) = run_aggregation(&config).unwrap();

    assert_eq!(result.level, AggregationLevel::Organization);
    assert_eq!(result.metrics.len(), 1);
    let org = &result.metrics[0];
    assert_eq!(org.organization_id, 2_000_000_001);
    assert_eq!(org.count_level_3, 50.0);
    assert_eq!(org.count_level_4_5, 20.0);
    assert_eq!(org.total_procedure_codes, 50.0);
    assert_eq!(org.aggregation_level, AggregationLevel::Organization);
    // provider 2 has no reassignment and is dropped
    assert_eq!(result.stats.unmatched_rows, 2);
}

#[test]
fn test_no_evaluation_codes_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "utilization.csv",
        "Rndrng_NPI,HCPCS_Cd,Tot_Srvcs\n1000000001,G0008,10\n1000000001,11042,5\n",
    );
    let output = dir.path().join("metrics.csv");

    let (result, _) = run_aggregation(&AggregationConfig::new(&input, &output)).unwrap();
    assert!(result.metrics.is_empty());
    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("npi,"));
}

#[test]
fn test_missing_utilization_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("metrics.csv");
    let config = AggregationConfig::new(dir.path().join("absent.csv"), &output);

    let err = run_aggregation(&config).unwrap_err();
    assert!(matches!(err, icp_score::IcpError::MissingInput { .. }));
    assert!(!output.exists());
}

#[test]
fn test_malformed_provider_id_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "utilization.csv",
        "Rndrng_NPI,HCPCS_Cd,Tot_Srvcs\nnot-an-npi,99213,10\n",
    );
    let output = dir.path().join("metrics.csv");

    let err = run_aggregation(&AggregationConfig::new(&input, &output)).unwrap_err();
    assert!(matches!(err, icp_score::IcpError::InvalidValue { .. }));
    assert!(!output.exists());
}
