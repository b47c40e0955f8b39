//! Chunked table readers for CSV and Parquet inputs.
//!
//! CSV files are decoded with every column as text so that dirty numeric
//! cells never abort a read; typed parsing happens per column in the
//! extractors. Parquet files keep their stored types. Both yield Arrow
//! `RecordBatch`es of at most `batch_size` rows.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::TableFormat;
use crate::error::util::safe_open_file;
use crate::error::{IcpError, Result};

/// Iterator over the record batches of one table
pub type BatchIter = Box<dyn Iterator<Item = Result<RecordBatch>>>;

/// Which columns a reader needs from a table
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnSelection<'a> {
    /// Columns that must exist; their absence fails the open
    pub required: &'a [&'a str],
    /// Columns read when present
    pub optional: &'a [&'a str],
}

impl<'a> ColumnSelection<'a> {
    #[must_use]
    pub const fn new(required: &'a [&'a str], optional: &'a [&'a str]) -> Self {
        Self { required, optional }
    }

    /// Resolve the selection against a file schema into projection indices
    fn project(&self, schema: &Schema) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(self.required.len() + self.optional.len());
        for name in self.required {
            let idx = schema
                .index_of(name)
                .map_err(|_| IcpError::column_not_found(name))?;
            indices.push(idx);
        }
        indices.extend(
            self.optional
                .iter()
                .filter_map(|name| schema.index_of(name).ok()),
        );
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

/// Open a table and stream it in batches
///
/// # Arguments
/// * `path` - CSV or Parquet file, chosen by extension
/// * `role` - What the table is, used in error messages
/// * `columns` - Required and optional columns to project
/// * `batch_size` - Maximum rows per batch
///
/// # Errors
/// `MissingInput` when the file does not exist, `ColumnNotFound` when a
/// required column is absent, or a decode error.
pub fn open_table(
    path: &Path,
    role: &str,
    columns: ColumnSelection<'_>,
    batch_size: usize,
) -> Result<BatchIter> {
    match TableFormat::from_path(path) {
        TableFormat::Csv => open_csv(path, role, columns, batch_size),
        TableFormat::Parquet => open_parquet(path, role, columns, batch_size),
    }
}

/// Read a whole table into memory
pub fn read_table(
    path: &Path,
    role: &str,
    columns: ColumnSelection<'_>,
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    open_table(path, role, columns, batch_size)?.collect()
}

/// Schema of a CSV file with every column typed as text
pub fn csv_text_schema(file: &mut File, path: &Path) -> Result<SchemaRef> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut *file, Some(0))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| IcpError::io(path, e))?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    Ok(Arc::new(Schema::new(fields)))
}

fn open_csv(
    path: &Path,
    role: &str,
    columns: ColumnSelection<'_>,
    batch_size: usize,
) -> Result<BatchIter> {
    let mut file = safe_open_file(path, role)?;
    let schema = csv_text_schema(&mut file, path)?;
    let projection = columns.project(&schema)?;

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(batch_size)
        .with_projection(projection)
        .build(file)?;

    Ok(Box::new(reader.map(|batch| batch.map_err(IcpError::from))))
}

fn open_parquet(
    path: &Path,
    role: &str,
    columns: ColumnSelection<'_>,
    batch_size: usize,
) -> Result<BatchIter> {
    let file = safe_open_file(path, role)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let projection = columns.project(builder.schema())?;
    let mask = ProjectionMask::roots(builder.parquet_schema(), projection);

    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()?;

    Ok(Box::new(reader.map(|batch| batch.map_err(IcpError::from))))
}
