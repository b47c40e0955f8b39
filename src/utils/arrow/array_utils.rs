//! Utilities for working with Arrow arrays.
//!
//! CSV inputs are decoded as text, Parquet inputs keep their stored types.
//! Callers ask for the type they want and these helpers cast when needed.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast::{CastOptions, cast_with_options};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{IcpError, Result};

/// Get a column from a record batch, cast to the expected type
///
/// Casting is lenient: cells that cannot be converted become null, the way a
/// coercing numeric parse turns junk into missing values.
///
/// # Arguments
///
/// * `batch` - The record batch containing the column
/// * `column_name` - The name of the column to extract
/// * `expected_type` - The data type the caller works with
/// * `required` - Whether a missing column is an error
///
/// # Returns
///
/// * `Ok(Some(ArrayRef))` - The column, converted if necessary
/// * `Ok(None)` - The column is absent and not required
/// * `Err(IcpError)` - The column is absent and required, or the cast is unsupported
pub fn get_column(
    batch: &RecordBatch,
    column_name: &str,
    expected_type: &DataType,
    required: bool,
) -> Result<Option<ArrayRef>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(IcpError::column_not_found(column_name));
        }
        debug!("Column '{column_name}' not found in record batch");
        return Ok(None);
    };

    let column = batch.column(idx);
    if column.data_type() == expected_type {
        return Ok(Some(column.clone()));
    }

    let options = CastOptions {
        safe: true,
        ..CastOptions::default()
    };
    let converted = cast_with_options(column, expected_type, &options)?;
    Ok(Some(converted))
}

/// Downcast a column to a specific array type with a clear error
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        IcpError::invalid_value(
            column_name,
            &format!("{:?}", array.data_type()),
            format!("expected {expected_type_name} column"),
        )
    })
}
