//! Summary report over a scored batch

use std::collections::BTreeMap;

use log::info;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::algorithm::scoring::quality::{DataQualityStats, SpecialtyCoverage};
use crate::models::{ScoreResult, ScoringTrack, Tier};

/// Score distribution for one track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub track: ScoringTrack,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub tiers: BTreeMap<String, usize>,
}

/// Summary of a scoring run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringSummary {
    pub organizations: usize,
    /// Tracks with at least one organization, in track order
    pub tracks: Vec<TrackSummary>,
    pub tiers: BTreeMap<String, usize>,
    /// Distinct composite scores
    pub unique_scores: usize,
    pub coverage: Vec<SpecialtyCoverage>,
}

fn tier_counts<'a>(results: impl Iterator<Item = &'a ScoreResult>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> =
        Tier::ALL.iter().map(|tier| (tier.to_string(), 0)).collect();
    for result in results {
        *counts.entry(result.tier.to_string()).or_default() += 1;
    }
    counts
}

impl ScoringSummary {
    #[must_use]
    pub fn new(results: &[ScoreResult], quality: &DataQualityStats) -> Self {
        let tracks = ScoringTrack::ALL
            .iter()
            .filter_map(|&track| {
                let scores: Vec<f64> = results
                    .iter()
                    .filter(|r| r.track == track)
                    .map(|r| r.icp_score)
                    .collect();
                if scores.is_empty() {
                    return None;
                }
                Some(TrackSummary {
                    track,
                    count: scores.len(),
                    mean: scores.iter().sum::<f64>() / scores.len() as f64,
                    min: scores.iter().copied().fold(f64::INFINITY, f64::min),
                    max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    tiers: tier_counts(results.iter().filter(|r| r.track == track)),
                })
            })
            .collect();

        let unique_scores = results
            .iter()
            .map(|r| r.icp_score.to_bits())
            .collect::<FxHashSet<u64>>()
            .len();

        Self {
            organizations: results.len(),
            tracks,
            tiers: tier_counts(results.iter()),
            unique_scores,
            coverage: quality.coverage(),
        }
    }

    /// Write the report to the log at info level
    pub fn log(&self) {
        info!("Scored organizations: {}", self.organizations);
        for track in &self.tracks {
            info!(
                "{} track: {} organizations, mean {:.1}, min {:.1}, max {:.1}",
                track.track, track.count, track.mean, track.min, track.max
            );
            for (tier, count) in &track.tiers {
                info!("  {tier}: {count}");
            }
        }
        for (tier, count) in &self.tiers {
            info!("{tier}: {count}");
        }
        info!("Unique scores: {}", self.unique_scores);
    }
}
