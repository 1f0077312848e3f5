use arrow::array::{Array, Float32Array, Int32Array, Int64Array, ListArray};
use arrow::record_batch::RecordBatch;

use super::EventError;

/// Get a required Int64 column by name.
pub(super) fn get_int64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int64Array, EventError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| EventError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| EventError::InvalidFormat(format!("{} is not Int64", name)))
}

/// Get a required list column by name.
pub(super) fn get_list_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ListArray, EventError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| EventError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<ListArray>()
        .ok_or_else(|| EventError::InvalidFormat(format!("{} is not a list column", name)))
}

/// Float32 items of one list row; a null row reads as empty.
pub(super) fn float32_row(list: &ListArray, name: &str, row: usize) -> Result<Vec<f32>, EventError> {
    if list.is_null(row) {
        return Ok(Vec::new());
    }
    let values = list.value(row);
    let values = values
        .as_any()
        .downcast_ref::<Float32Array>()
        .ok_or_else(|| EventError::InvalidFormat(format!("{} items are not Float32", name)))?;
    Ok(values.values().to_vec())
}

/// Int32 items of one list row; a null row reads as empty.
pub(super) fn int32_row(list: &ListArray, name: &str, row: usize) -> Result<Vec<i32>, EventError> {
    if list.is_null(row) {
        return Ok(Vec::new());
    }
    let values = list.value(row);
    let values = values
        .as_any()
        .downcast_ref::<Int32Array>()
        .ok_or_else(|| EventError::InvalidFormat(format!("{} items are not Int32", name)))?;
    Ok(values.values().to_vec())
}
