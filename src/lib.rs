//! Medicare claims coding signals and ideal-customer-profile scoring.
//!
//! Two stages: the code aggregator streams a provider-by-service
//! utilization extract into per-organization coding metrics, and the
//! scoring engine turns enriched organization rows into an explainable
//! 0-100 score with tier, pain label, drivers and rationale.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod staging;
pub mod utils;

// Core types
pub use config::{AggregationConfig, ScoringConfig, TableFormat};
pub use error::{IcpError, Result};
pub use models::{OrgCodeMetrics, OrgEnrichedRecord, ScoreResult, ScoreRow};

// Algorithms
pub use algorithm::aggregation::{AggregationOutput, AggregationSummary, CodeAggregator, ReassignmentBridge};
pub use algorithm::scoring::{DataQualityStats, ScoringEngine, ScoringOutput, ScoringSummary, score_organization};

// Runs
pub use pipeline::{load_organizations, run_aggregation, run_scoring};

// Arrow types
pub use arrow::record_batch::RecordBatch;
