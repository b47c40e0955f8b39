use icp_score::ScoringEngine;
use icp_score::algorithm::scoring::DataQualityStats;

use crate::utils::synthetic_organizations;

#[test]
fn test_parallel_matches_sequential() {
    let records = synthetic_organizations(2_500, 3);

    let parallel = ScoringEngine::new(true).score_all(&records);
    let sequential = ScoringEngine::new(false).score_all(&records);

    assert_eq!(parallel.results, sequential.results);
    assert_eq!(parallel.quality, sequential.quality);
    assert!(parallel.quality.procedure_heavy_specialties > 0);
}

#[test]
fn test_quality_merge_matches_sequential_accumulation() {
    let records = synthetic_organizations(1_000, 5);
    let events: Vec<_> = records
        .iter()
        .filter_map(|record| icp_score::score_organization(record).1)
        .collect();

    let sequential = DataQualityStats::from_events(&events);
    let (left, right) = events.split_at(events.len() / 3);
    let merged = DataQualityStats::from_events(left).merge(DataQualityStats::from_events(right));

    assert_eq!(merged, sequential);
    assert_eq!(
        sequential.has_data + sequential.missing_data + sequential.low_volume,
        sequential.procedure_heavy_specialties
    );
}
