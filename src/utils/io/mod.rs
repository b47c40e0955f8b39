//! Writers for result tables and reports

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Serialize;

use crate::config::TableFormat;
use crate::error::{IcpError, Result};
use crate::error::util::create_output_file;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Write a batch as CSV (with header) or Parquet, chosen by extension
///
/// An empty batch still produces a header row, or a Parquet file with the
/// schema and no rows.
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    let started = Instant::now();
    log_operation_start("Writing", path);
    let file = create_output_file(path)?;

    match TableFormat::from_path(path) {
        TableFormat::Csv => {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .build(BufWriter::new(file));
            writer.write(batch)?;
            writer
                .into_inner()
                .flush()
                .map_err(|e| IcpError::io(path, e))?;
        }
        TableFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
            writer.write(batch)?;
            writer.close()?;
        }
    }

    log_operation_complete("wrote", path, batch.num_rows(), started);
    Ok(())
}

/// Write any serializable report as pretty-printed JSON
pub fn write_json_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let file = create_output_file(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(|e| IcpError::io(path, e))?;
    log::info!("Report saved to {}", path.display());
    Ok(())
}
