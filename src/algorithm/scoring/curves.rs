//! Continuous scoring curves
//!
//! Each curve maps one raw signal onto a bounded number of points. Fractional
//! results are rounded to one decimal place.

/// Undercoding ratio at or above which documentation is strong
pub const UNDERCODING_NATIONAL_AVG: f64 = 0.45;
/// Undercoding ratio at or below which undercoding is severe
pub const UNDERCODING_SEVERE: f64 = 0.15;
/// Points when no undercoding or psych data exists
pub const NO_DATA_POINTS: f64 = 10.0;

/// Psych risk ratio at or below which therapy is severely undercoded
pub const PSYCH_SEVERE_LOW: f64 = 0.30;
/// Psych risk ratio at or above which audit risk is severe
pub const PSYCH_SEVERE_HIGH: f64 = 0.75;
/// Balanced psych coding plateau
pub const PSYCH_BALANCED: (f64, f64) = (0.40, 0.60);

/// Points awarded by a curve with the reason they were awarded
#[derive(Debug, Clone, PartialEq)]
pub struct CurveScore {
    pub points: f64,
    pub reason: String,
}

impl CurveScore {
    fn new(points: f64, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: reason.into(),
        }
    }
}

/// Round to one decimal place
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Position of `value` between `floor` and `ceiling` on a log scale, in `[0, 1]`
fn log_position(value: f64, floor: f64, ceiling: f64) -> f64 {
    ((value.ln() - floor.ln()) / (ceiling.ln() - floor.ln())).clamp(0.0, 1.0)
}

/// Undercoding pain
///
/// Missing or non-positive ratios score 10. At or above the national average
/// the score is 0; at or below 0.15 it is 40; between, it falls linearly
/// from 40 to 15.
#[must_use]
pub fn score_undercoding_continuous(ratio: Option<f64>) -> CurveScore {
    let ratio = match ratio {
        Some(r) if r > 0.0 => r,
        _ => return CurveScore::new(NO_DATA_POINTS, "No undercoding data available"),
    };
    if ratio >= UNDERCODING_NATIONAL_AVG {
        return CurveScore::new(0.0, format!("Strong E&M documentation ({ratio:.3})"));
    }
    if ratio <= UNDERCODING_SEVERE {
        return CurveScore::new(40.0, format!("Severe undercoding ({ratio:.3})"));
    }
    let position = (ratio - UNDERCODING_SEVERE) / (UNDERCODING_NATIONAL_AVG - UNDERCODING_SEVERE);
    CurveScore::new(
        round1(40.0 - position * 25.0),
        format!("Undercoding ratio {ratio:.3}"),
    )
}

/// Psych risk pain, a U-shaped curve
///
/// Both tails (at most 0.30, at least 0.75) score 40, the balanced plateau
/// [0.40, 0.60] scores 10, and the shoulders rise linearly between.
#[must_use]
pub fn score_psych_risk_continuous(ratio: Option<f64>) -> CurveScore {
    let ratio = match ratio {
        Some(r) if r > 0.0 => r,
        _ => return CurveScore::new(NO_DATA_POINTS, "No psych risk data available"),
    };
    let (balanced_low, balanced_high) = PSYCH_BALANCED;

    if ratio <= PSYCH_SEVERE_LOW {
        CurveScore::new(
            40.0,
            format!("Severe therapy undercoding ({ratio:.3}) - Revenue Leakage"),
        )
    } else if ratio >= PSYCH_SEVERE_HIGH {
        CurveScore::new(
            40.0,
            format!("Severe psych audit risk ({ratio:.3}) - Compliance Threat"),
        )
    } else if (balanced_low..=balanced_high).contains(&ratio) {
        CurveScore::new(
            10.0,
            format!("Balanced therapy coding ({ratio:.3}) - Appropriate"),
        )
    } else if ratio < balanced_low {
        let deviation = (balanced_low - ratio) / (balanced_low - PSYCH_SEVERE_LOW);
        CurveScore::new(
            round1(10.0 + deviation * 30.0),
            format!("Moderate therapy undercoding ({ratio:.3})"),
        )
    } else {
        let deviation = (ratio - balanced_high) / (PSYCH_SEVERE_HIGH - balanced_high);
        CurveScore::new(
            round1(10.0 + deviation * 30.0),
            format!("Elevated psych audit risk ({ratio:.3})"),
        )
    }
}

/// Provider count complexity: 0 for a single provider, 10 from 100 up,
/// logarithmic between
#[must_use]
pub fn score_provider_count_continuous(npi_count: f64) -> f64 {
    if npi_count.is_nan() || npi_count <= 1.0 {
        return 0.0;
    }
    if npi_count >= 100.0 {
        return 10.0;
    }
    round1(npi_count.ln() / 100f64.ln() * 10.0)
}

/// Revenue band for the deal-size curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueScale {
    /// $100K to $5M
    Fqhc,
    /// $1M to $15M
    Behavioral,
    /// $500K to $15M
    General,
}

impl RevenueScale {
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Fqhc => (100_000.0, 5_000_000.0),
            Self::Behavioral => (1_000_000.0, 15_000_000.0),
            Self::General => (500_000.0, 15_000_000.0),
        }
    }
}

/// Deal size: 2 at or below the floor, 15 at or above the ceiling,
/// logarithmic between
#[must_use]
pub fn score_revenue_continuous(revenue: f64, scale: RevenueScale) -> f64 {
    let (floor, ceiling) = scale.bounds();
    if revenue.is_nan() || revenue <= floor {
        return 2.0;
    }
    if revenue >= ceiling {
        return 15.0;
    }
    round1((2.0 + log_position(revenue, floor, ceiling) * 13.0).clamp(2.0, 15.0))
}

/// Volume band for the expansion curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeScale {
    /// 500 to 20,000
    Behavioral,
    /// 1,000 to 50,000
    General,
}

impl VolumeScale {
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Behavioral => (500.0, 20_000.0),
            Self::General => (1_000.0, 50_000.0),
        }
    }
}

/// Expansion potential: 3 at or below the floor, the maximum (15 verified,
/// 10 estimated) at or above the ceiling, logarithmic between
#[must_use]
pub fn score_volume_continuous(volume: f64, scale: VolumeScale, verified: bool) -> f64 {
    let max_score = if verified { 15.0 } else { 10.0 };
    let (floor, ceiling) = scale.bounds();
    if volume.is_nan() || volume <= floor {
        return 3.0;
    }
    if volume >= ceiling {
        return max_score;
    }
    round1((3.0 + log_position(volume, floor, ceiling) * (max_score - 3.0)).clamp(3.0, max_score))
}
