use icp_score::algorithm::aggregation::CodeAggregator;
use icp_score::models::{AggregationLevel, OrgCodeMetrics};
use icp_score::{AggregationConfig, run_aggregation};

use crate::utils::{synthetic_services, utilization_csv, write_fixture};

fn aggregate_in_chunks(chunk_size: usize) -> Vec<OrgCodeMetrics> {
    let records = synthetic_services(20_000, 40, 7);
    let mut aggregator = CodeAggregator::new(None);
    for chunk in records.chunks(chunk_size) {
        aggregator.process_chunk(chunk);
    }
    aggregator.finish().metrics
}

#[test]
fn test_chunk_size_does_not_change_results() {
    let small = aggregate_in_chunks(1_000);
    let whole = aggregate_in_chunks(1_000_000);
    let odd = aggregate_in_chunks(7);

    assert!(!whole.is_empty());
    assert_eq!(small, whole);
    assert_eq!(odd, whole);
}

#[test]
fn test_metrics_invariants() {
    for metrics in aggregate_in_chunks(1_000) {
        assert!(metrics.total_eval_codes >= 10.0);
        assert!((0.0..=1.0).contains(&metrics.undercoding_ratio));
        assert!((0.0..=1.0).contains(&metrics.procedure_ratio));
        assert_eq!(
            metrics.total_eval_codes,
            metrics.count_level_3 + metrics.count_level_4_5
        );
        assert_eq!(metrics.aggregation_level, AggregationLevel::Individual);
    }
}

#[test]
fn test_csv_batch_size_and_rerun_produce_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let records = synthetic_services(5_000, 25, 11);
    let input = write_fixture(dir.path(), "utilization.csv", &utilization_csv(&records));

    let mut outputs = Vec::new();
    for (i, batch_size) in [3, 1_000, 1_000_000, 1_000].into_iter().enumerate() {
        let output = dir.path().join(format!("metrics_{i}.csv"));
        let config = AggregationConfig::new(&input, &output).with_batch_size(batch_size);
        let (result, _) = run_aggregation(&config).unwrap();
        assert_eq!(result.stats.rows_processed, 5_000);
        outputs.push(std::fs::read_to_string(&output).unwrap());
    }

    assert!(outputs[0].starts_with(
        "npi,undercoding_ratio,total_eval_codes,count_level_3,count_level_4_5,total_procedure_codes,procedure_ratio,aggregation_level"
    ));
    assert!(outputs.iter().all(|contents| contents == &outputs[0]));
}
