use icp_score::algorithm::scoring::curves::{
    RevenueScale, VolumeScale, score_provider_count_continuous, score_psych_risk_continuous,
    score_revenue_continuous, score_undercoding_continuous, score_volume_continuous,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_undercoding_bounded_and_non_increasing(a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_score = score_undercoding_continuous(Some(low)).points;
        let high_score = score_undercoding_continuous(Some(high)).points;
        prop_assert!((0.0..=40.0).contains(&low_score));
        prop_assert!((0.0..=40.0).contains(&high_score));
        if low > 0.0 {
            prop_assert!(low_score >= high_score);
        }
    }

    #[test]
    fn test_psych_risk_bounded(ratio in 0.0f64..1.0) {
        let points = score_psych_risk_continuous(Some(ratio)).points;
        prop_assert!((10.0..=40.0).contains(&points));
    }

    #[test]
    fn test_revenue_bounded_and_non_decreasing(a in 0.0f64..1e8, b in 0.0f64..1e8) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        for scale in [RevenueScale::Fqhc, RevenueScale::Behavioral, RevenueScale::General] {
            let low_score = score_revenue_continuous(low, scale);
            let high_score = score_revenue_continuous(high, scale);
            prop_assert!((2.0..=15.0).contains(&low_score));
            prop_assert!(low_score <= high_score);
        }
    }

    #[test]
    fn test_volume_bounded_and_non_decreasing(a in 0.0f64..1e6, b in 0.0f64..1e6, verified: bool) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let max = if verified { 15.0 } else { 10.0 };
        for scale in [VolumeScale::Behavioral, VolumeScale::General] {
            let low_score = score_volume_continuous(low, scale, verified);
            let high_score = score_volume_continuous(high, scale, verified);
            prop_assert!((3.0..=max).contains(&low_score));
            prop_assert!(low_score <= high_score);
        }
    }

    #[test]
    fn test_provider_count_bounded_and_non_decreasing(a in 0.0f64..500.0, b in 0.0f64..500.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_score = score_provider_count_continuous(low);
        prop_assert!((0.0..=10.0).contains(&low_score));
        prop_assert!(low_score <= score_provider_count_continuous(high));
    }
}

#[test]
fn test_curve_anchors() {
    assert_eq!(score_undercoding_continuous(Some(0.15)).points, 40.0);
    assert_eq!(score_undercoding_continuous(Some(0.45)).points, 0.0);
    assert_eq!(score_undercoding_continuous(None).points, 10.0);
    assert_eq!(score_psych_risk_continuous(Some(0.5)).points, 10.0);
    assert_eq!(score_revenue_continuous(15_000_000.0, RevenueScale::General), 15.0);
    assert_eq!(score_revenue_continuous(-1.0, RevenueScale::General), 2.0);
    assert_eq!(score_volume_continuous(50_000.0, VolumeScale::General, false), 10.0);
    assert_eq!(score_provider_count_continuous(100.0), 10.0);
}
