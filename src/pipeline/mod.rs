//! End-to-end runs: aggregate utilization into coding metrics, and score
//! enriched organizations

use std::time::Instant;

use log::info;

use crate::algorithm::aggregation::{
    AggregationOutput, AggregationSummary, CodeAggregator, ReassignmentBridge,
};
use crate::algorithm::scoring::{ScoringEngine, ScoringOutput};
use crate::common::traits::{ArrowOutput, RecordAdapter};
use crate::config::{AggregationConfig, ScoringConfig};
use crate::error::Result;
use crate::models::claims::UTILIZATION_COLUMNS;
use crate::models::organization::columns;
use crate::models::{AggregationLevel, OrgCodeMetrics, OrgEnrichedRecord, ScoreRow};
use crate::reader::{ColumnSelection, open_table, read_table};
use crate::staging::apply_staging;
use crate::utils::io::{write_json_report, write_table};
use crate::utils::logging::{
    create_row_spinner, finish_progress_bar, log_operation_complete, log_operation_start,
};

/// Stream the utilization extract through the aggregator and write metrics
///
/// # Errors
/// Fails when the utilization file or one of its required columns is
/// missing, a provider id is malformed, or the output cannot be written.
/// Missing bridge files only degrade the run to individual level.
pub fn run_aggregation(config: &AggregationConfig) -> Result<(AggregationOutput, AggregationSummary)> {
    config.validate()?;
    let started = Instant::now();

    let bridge = ReassignmentBridge::load(
        config.enrollment_path.as_deref(),
        config.reassignment_path.as_deref(),
        config.batch_size,
    )?;
    let mut aggregator = CodeAggregator::new(bridge);
    info!("Aggregation level: {}", aggregator.aggregation_level());

    log_operation_start("Reading utilization from", &config.utilization_path);
    let batches = open_table(
        &config.utilization_path,
        "utilization",
        ColumnSelection::new(&UTILIZATION_COLUMNS, &[]),
        config.batch_size,
    )?;

    let spinner = create_row_spinner("utilization rows");
    for batch in batches {
        let batch = batch?;
        aggregator.process_batch(&batch)?;
        spinner.inc(batch.num_rows() as u64);
    }
    finish_progress_bar(&spinner, "utilization read");

    let output = aggregator.finish();
    let stats = output.stats;
    info!(
        "Processed {} rows: {} evaluation, {} procedure",
        stats.rows_processed, stats.eval_rows, stats.procedure_rows
    );
    if output.level == AggregationLevel::Organization {
        info!(
            "Bridge credited {} rows; {} rows had no organization",
            stats.bridged_rows, stats.unmatched_rows
        );
    }
    info!(
        "Dropped {} organizations under the evaluation volume floor",
        stats.below_volume_floor
    );

    let batch = OrgCodeMetrics::to_record_batch(&output.metrics)?;
    write_table(&config.output_path, &batch)?;

    let summary = AggregationSummary::from_metrics(&output.metrics);
    summary.log();
    log_operation_complete("aggregated", &config.utilization_path, stats.rows_processed, started);
    Ok((output, summary))
}

/// Load the enriched organization table
pub fn load_organizations(config: &ScoringConfig) -> Result<Vec<OrgEnrichedRecord>> {
    let started = Instant::now();
    log_operation_start("Loading organizations from", &config.input_path);
    let batches = read_table(
        &config.input_path,
        "scoring",
        ColumnSelection::new(&columns::REQUIRED, &columns::OPTIONAL),
        config.batch_size,
    )?;
    let records = OrgEnrichedRecord::from_record_batches(&batches)?;
    log_operation_complete("read", &config.input_path, records.len(), started);
    Ok(records)
}

/// Score every organization in the input table and write the results
///
/// # Errors
/// Fails when the input table or its `npi` column is missing, or an output
/// cannot be written. Missing staging tables degrade their columns.
pub fn run_scoring(config: &ScoringConfig) -> Result<ScoringOutput> {
    config.validate()?;
    let started = Instant::now();

    let mut records = load_organizations(config)?;
    apply_staging(&mut records, config)?;

    let output = ScoringEngine::new(config.parallel).score_all(&records);

    let rows: Vec<ScoreRow> = output.results.iter().map(ScoreRow::from).collect();
    let batch = ScoreRow::to_record_batch(&rows)?;
    write_table(&config.output_path, &batch)?;

    output.summary().log();
    output.quality.log();
    if let Some(path) = &config.quality_report_path {
        write_json_report(path, &output.quality)?;
    }

    log_operation_complete("scored", &config.input_path, output.results.len(), started);
    Ok(output)
}
