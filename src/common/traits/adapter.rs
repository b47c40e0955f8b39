//! Record batch adapters
//!
//! Input tables are converted into domain models through `RecordAdapter`;
//! output models are turned back into batches through `ArrowOutput`.

use arrow::datatypes::{FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;

/// Core adapter trait for reading domain models out of Arrow data
///
/// Implementations pull the columns they need by name, so batches may carry
/// extra columns or omit optional ones.
pub trait RecordAdapter: Sized {
    /// Convert a `RecordBatch` into domain model objects
    ///
    /// # Arguments
    ///
    /// * `batch` - The Arrow `RecordBatch` to convert
    ///
    /// # Returns
    ///
    /// * `Result<Vec<Self>>` - One model per accepted row
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>>;

    /// Convert several batches, preserving row order
    fn from_record_batches(batches: &[RecordBatch]) -> Result<Vec<Self>> {
        let mut models = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
        for batch in batches {
            models.extend(Self::from_record_batch(batch)?);
        }
        Ok(models)
    }
}

/// Models that are written out as tables
///
/// The schema is declared explicitly so that an empty result still produces
/// a table with the full header.
pub trait ArrowOutput: Serialize + Sized {
    /// Get the Arrow schema for this model
    fn schema() -> Schema;

    /// Get the schema as `Arc<Schema>`
    fn schema_ref() -> SchemaRef {
        Arc::new(Self::schema())
    }

    /// Convert a slice of models to a `RecordBatch` using `serde_arrow`
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let fields: Vec<FieldRef> = Self::schema().fields().iter().cloned().collect();
        Ok(serde_arrow::to_record_batch(&fields, &rows)?)
    }
}
