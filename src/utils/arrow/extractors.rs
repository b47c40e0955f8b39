//! Typed column views over Arrow record batches
//!
//! Each view casts its column once per batch and then answers per-row
//! lookups. Missing optional columns behave like all-null columns.

use arrow::array::{Array, Float64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::arrow::array_utils::{downcast_array, get_column};

/// A text column; blank cells read as missing
#[derive(Debug, Clone, Default)]
pub struct TextColumn {
    array: Option<StringArray>,
}

impl TextColumn {
    /// Extract a text column from a batch
    ///
    /// # Arguments
    /// * `batch` - The record batch to read from
    /// * `column_name` - The name of the column
    /// * `required` - Whether an absent column is an error
    pub fn from_batch(batch: &RecordBatch, column_name: &str, required: bool) -> Result<Self> {
        let array = match get_column(batch, column_name, &DataType::Utf8, required)? {
            Some(array) => Some(downcast_array::<StringArray>(&array, column_name, "Utf8")?.clone()),
            None => None,
        };
        Ok(Self { array })
    }

    /// Trimmed cell value, `None` for null or blank cells
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&str> {
        let array = self.array.as_ref()?;
        if row >= array.len() || array.is_null(row) {
            return None;
        }
        let value = array.value(row).trim();
        (!value.is_empty()).then_some(value)
    }
}

/// A numeric column; unparseable and NaN cells read as missing
#[derive(Debug, Clone, Default)]
pub struct NumberColumn {
    array: Option<Float64Array>,
}

impl NumberColumn {
    pub fn from_batch(batch: &RecordBatch, column_name: &str, required: bool) -> Result<Self> {
        let array = match get_column(batch, column_name, &DataType::Float64, required)? {
            Some(array) => {
                Some(downcast_array::<Float64Array>(&array, column_name, "Float64")?.clone())
            }
            None => None,
        };
        Ok(Self { array })
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<f64> {
        let array = self.array.as_ref()?;
        if row >= array.len() || array.is_null(row) {
            return None;
        }
        let value = array.value(row);
        (!value.is_nan()).then_some(value)
    }
}

/// A boolean flag column
///
/// Only the text `true` (any case) counts as set; everything else, including
/// missing cells and `1`, reads as false.
#[derive(Debug, Clone, Default)]
pub struct FlagColumn {
    text: TextColumn,
}

impl FlagColumn {
    pub fn from_batch(batch: &RecordBatch, column_name: &str, required: bool) -> Result<Self> {
        Ok(Self {
            text: TextColumn::from_batch(batch, column_name, required)?,
        })
    }

    #[must_use]
    pub fn get(&self, row: usize) -> bool {
        self.text
            .get(row)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}
