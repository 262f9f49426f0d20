use anyhow::{anyhow, bail, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use serde_json::{Map, Number, Value};

/// One row as the JSON object sent to the insert endpoint.
pub type Record = Map<String, Value>;

/// Turn every row of `batch` into a record. Missing values, and floats JSON
/// cannot carry (NaN, ±inf), become explicit `null`.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<Record>> {
    let schema = batch.schema();
    let mut records = vec![Map::with_capacity(batch.num_columns()); batch.num_rows()];

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        for (row, record) in records.iter_mut().enumerate() {
            record.insert(field.name().clone(), value_at(column, row)?);
        }
    }

    Ok(records)
}

fn value_at(column: &ArrayRef, row: usize) -> Result<Value> {
    if column.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match column.data_type() {
        DataType::Int64 => Value::from(downcast::<Int64Array>(column)?.value(row)),
        DataType::Float64 => Number::from_f64(downcast::<Float64Array>(column)?.value(row))
            .map_or(Value::Null, Value::Number),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(column)?.value(row)),
        DataType::Utf8 => Value::String(downcast::<StringArray>(column)?.value(row).to_string()),
        other => bail!("cannot serialise column type {}", other),
    };
    Ok(value)
}

fn downcast<T: 'static>(column: &ArrayRef) -> Result<&T> {
    column
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("column is not {}", column.data_type()))
}
