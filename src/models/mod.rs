//! Domain models for claims aggregation and organization scoring

pub mod claims;
pub mod metrics;
pub mod organization;
pub mod score;

pub use claims::{EnrollmentRecord, ReassignmentLink, ReassignmentRecord, ServiceRecord};
pub use metrics::{AggregationLevel, OrgCodeMetrics};
pub use organization::{OrgEnrichedRecord, SegmentLabel};
pub use score::{
    FitBreakdown, PainBreakdown, PainLabel, ScoreResult, ScoreRow, ScoringTrack,
    StrategyBreakdown, Tier, VolumeUnit,
};
