//! Distribution report over aggregated coding metrics

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::models::OrgCodeMetrics;

/// Ratio below which undercoding is severe
pub const SEVERE_UNDERCODING: f64 = 0.30;
/// Upper bound of moderate undercoding
pub const MODERATE_UNDERCODING: f64 = 0.50;
/// Procedure ratio reported as low
pub const LOW_PROCEDURE_RATIO: f64 = 0.30;

/// Mean, median and range of a set of ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioDistribution {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl RatioDistribution {
    /// `None` for an empty input
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let sorted: Vec<f64> = values.into_iter().sorted_by(f64::total_cmp).collect();
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Some(Self {
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
            min,
            max,
        })
    }
}

/// Summary of an aggregation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationSummary {
    pub organizations: usize,
    /// Undercoding ratio below 0.30
    pub severe_undercoding: usize,
    /// Undercoding ratio in [0.30, 0.50)
    pub moderate_undercoding: usize,
    pub undercoding: Option<RatioDistribution>,
    /// Organizations with any procedure volume
    pub with_procedures: usize,
    /// Procedure ratio among organizations with procedure volume
    pub procedure: Option<RatioDistribution>,
    /// Organizations with procedure volume and a ratio below 0.30
    pub low_procedure_ratio: usize,
}

impl AggregationSummary {
    #[must_use]
    pub fn from_metrics(metrics: &[OrgCodeMetrics]) -> Self {
        let severe_undercoding = metrics
            .iter()
            .filter(|m| m.undercoding_ratio < SEVERE_UNDERCODING)
            .count();
        let moderate_undercoding = metrics
            .iter()
            .filter(|m| (SEVERE_UNDERCODING..MODERATE_UNDERCODING).contains(&m.undercoding_ratio))
            .count();
        let with_procedures: Vec<&OrgCodeMetrics> = metrics
            .iter()
            .filter(|m| m.total_procedure_codes > 0.0)
            .collect();

        Self {
            organizations: metrics.len(),
            severe_undercoding,
            moderate_undercoding,
            undercoding: RatioDistribution::from_values(metrics.iter().map(|m| m.undercoding_ratio)),
            with_procedures: with_procedures.len(),
            procedure: RatioDistribution::from_values(with_procedures.iter().map(|m| m.procedure_ratio)),
            low_procedure_ratio: with_procedures
                .iter()
                .filter(|m| m.procedure_ratio < LOW_PROCEDURE_RATIO)
                .count(),
        }
    }

    /// Write the report to the log at info level
    pub fn log(&self) {
        info!("Total organizations: {}", self.organizations);
        if self.organizations == 0 {
            return;
        }
        info!(
            "Severe undercoding (< {SEVERE_UNDERCODING:.2}): {} organizations ({:.1}%)",
            self.severe_undercoding,
            percent(self.severe_undercoding, self.organizations)
        );
        info!(
            "Moderate undercoding ({SEVERE_UNDERCODING:.2}-{MODERATE_UNDERCODING:.2}): {} organizations ({:.1}%)",
            self.moderate_undercoding,
            percent(self.moderate_undercoding, self.organizations)
        );
        if let Some(d) = &self.undercoding {
            info!(
                "Undercoding ratio: mean {:.3}, median {:.3}, min {:.3}, max {:.3}",
                d.mean, d.median, d.min, d.max
            );
        }
        info!(
            "Organizations with procedures: {} ({:.1}%)",
            self.with_procedures,
            percent(self.with_procedures, self.organizations)
        );
        if let Some(d) = &self.procedure {
            info!(
                "Procedure ratio: mean {:.3}, median {:.3}, min {:.3}, max {:.3}",
                d.mean, d.median, d.min, d.max
            );
            info!(
                "Low procedure ratio (< {LOW_PROCEDURE_RATIO:.2}): {} organizations",
                self.low_procedure_ratio
            );
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}
