use icp_score::algorithm::scoring::DataQualityStats;
use icp_score::common::traits::RecordAdapter;
use icp_score::models::{OrgEnrichedRecord, SegmentLabel};
use icp_score::reader::{ColumnSelection, read_table};
use icp_score::{AggregationConfig, ScoringConfig, load_organizations, run_aggregation, run_scoring};

use crate::utils::write_fixture;

const ORGANIZATIONS: &str = "npi,org_name,segment_label,taxonomy,fqhc_flag,total_revenue,services_count,volume_source,npi_count,site_count,is_aco_participant,undercoding_ratio,total_eval_codes,total_procedure_codes,procedure_ratio,state_code,county_name\n\
    1000000001,Harbor Health Center,FQHC,,1,12000000,60000,UDS,40,8,True,0.12,5000,0,0,NM,San Juan\n\
    1000000002,Foot & Ankle Associates,Private Practice,213E00000X,0,,,,,,,0.6,400,44,0.1,NM,Bernalillo\n\
    1000000003,Valley Orthopedics,Specialty Group,207X00000X,0,,,,,,,0.5,300,,,TX,Starr\n\
    1000000004,Mercy Regional,Hospital,,0,5000000,,,,,,,,,,CA,Fresno\n";

const MIPS: &str = "org_npi,avg_mips_score,mips_clinician_count\n1000000001.0,91.5,35\n";

const DESIGNATIONS: &str = "state,county_name,is_hpsa,is_mua\n\
    NM,SAN JUAN,true,false\n\
    NM,San Juan,false,true\n\
    TX,Starr,true,true\n";

#[test]
fn test_aggregated_metrics_read_back_as_scoring_input() {
    let dir = tempfile::tempdir().unwrap();
    let utilization = write_fixture(
        dir.path(),
        "utilization.csv",
        "Rndrng_NPI,HCPCS_Cd,Tot_Srvcs\n\
         1000000001,99213,60\n\
         1000000001,99215,40\n\
         1000000001,20610,25\n",
    );
    let metrics = dir.path().join("metrics.csv");
    run_aggregation(&AggregationConfig::new(&utilization, &metrics)).unwrap();

    let batches = read_table(&metrics, "metrics", ColumnSelection::new(&["npi"], &[]), 100).unwrap();
    let records = OrgEnrichedRecord::from_record_batches(&batches).unwrap();
    assert_eq!(records.len(), 1);

    let scoring = ScoringConfig::new(&metrics, dir.path().join("unused.csv"));
    let records = load_organizations(&scoring).unwrap();
    let record = &records[0];
    assert_eq!(record.npi, "1000000001");
    assert_eq!(record.segment_label, SegmentLabel::MultiSpecialty);
    assert_eq!(record.undercoding_ratio, Some(0.4));
    assert_eq!(record.total_eval_codes, Some(100.0));
    assert_eq!(record.total_procedure_codes, Some(25.0));
    assert_eq!(record.procedure_ratio, Some(0.2));
}

#[test]
fn test_scoring_run_with_staging() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "organizations.csv", ORGANIZATIONS);
    let mips = write_fixture(dir.path(), "mips.csv", MIPS);
    let designations = write_fixture(dir.path(), "hpsa_mua.csv", DESIGNATIONS);
    let output = dir.path().join("scored.csv");
    let report = dir.path().join("quality.json");

    let config = ScoringConfig::new(&input, &output)
        .with_mips(&mips)
        .with_designations(&designations)
        .with_quality_report(&report);
    let result = run_scoring(&config).unwrap();

    assert_eq!(result.results.len(), 4);
    let fqhc = &result.results[0];
    assert_eq!(fqhc.npi, "1000000001");
    assert!(fqhc.fqhc_flag);
    assert_eq!(fqhc.fit.mips, 5.0);
    assert_eq!(fqhc.fit.hpsa_mua, 5.0);
    assert!(fqhc.fit_reasoning.contains(&"+5pts: HPSA/MUA designated area".to_string()));

    let ortho = result.results.iter().find(|r| r.npi == "1000000003").unwrap();
    assert_eq!(ortho.fit.hpsa_mua, 5.0);
    let hospital = result.results.iter().find(|r| r.npi == "1000000004").unwrap();
    assert_eq!(hospital.segment_label, SegmentLabel::AmbulatoryCenter);
    assert_eq!(hospital.fit.hpsa_mua, 0.0);

    // podiatry has data, orthopedics lacks a procedure ratio
    assert_eq!(result.quality.procedure_heavy_specialties, 2);
    assert_eq!(result.quality.has_data, 1);
    assert_eq!(result.quality.missing_data, 1);

    let saved: DataQualityStats = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(saved, result.quality);

    let contents = std::fs::read_to_string(&output).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("npi,org_name,icp_score,icp_tier,segment_label,fqhc_flag,scoring_track"));
    assert!(header.ends_with("score_reasoning_pain,score_reasoning_fit,score_reasoning_strategy"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn test_missing_staging_tables_degrade() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "organizations.csv", ORGANIZATIONS);
    let output = dir.path().join("scored.parquet");

    let config = ScoringConfig::new(&input, &output)
        .with_mips(dir.path().join("absent_mips.csv"))
        .with_designations(dir.path().join("absent_hpsa.csv"))
        .sequential();
    let result = run_scoring(&config).unwrap();

    assert!(result.results.iter().all(|r| r.fit.mips == 0.0 && r.fit.hpsa_mua == 0.0));
    let batches = read_table(&output, "scored", ColumnSelection::new(&["npi", "icp_score"], &[]), 100).unwrap();
    assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 4);
}

#[test]
fn test_missing_scoring_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("scored.csv");
    let config = ScoringConfig::new(dir.path().join("absent.csv"), &output);

    let err = run_scoring(&config).unwrap_err();
    assert!(matches!(err, icp_score::IcpError::MissingInput { .. }));
    assert!(!output.exists());
}
