use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, Int64Array},
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

pub const AGE: &str = "age";
pub const SIBSP: &str = "sibsp";
pub const PARCH: &str = "parch";
pub const IS_CHILD: &str = "is_child";
pub const FAMILY_SIZE: &str = "family_size";

/// Columns removed from the staged output when present.
pub const DROP_COLUMNS: &[&str] = &["passengerid"];

const CHILD_AGE_LIMIT: f64 = 18.0;

/// Add `is_child` (age < 18 → 1, else 0) when an `age` column exists.
pub fn add_is_child(batch: &RecordBatch) -> Result<RecordBatch> {
    let Some(age) = numeric_column(batch, AGE)? else {
        return Ok(batch.clone());
    };
    let flags: Int64Array = age
        .into_iter()
        .map(|a| Some(matches!(a, Some(v) if v < CHILD_AGE_LIMIT) as i64))
        .collect();
    set_column(batch, IS_CHILD, Arc::new(flags))
}

/// Add `family_size` = sibsp + parch + 1 when both columns exist.
/// Stays integer when both inputs are integer.
pub fn add_family_size(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let (Ok(si), Ok(pi)) = (schema.index_of(SIBSP), schema.index_of(PARCH)) else {
        return Ok(batch.clone());
    };

    let sibsp = batch.column(si).as_any().downcast_ref::<Int64Array>();
    let parch = batch.column(pi).as_any().downcast_ref::<Int64Array>();
    let family: ArrayRef = match (sibsp, parch) {
        (Some(s), Some(p)) => Arc::new(
            s.iter()
                .zip(p.iter())
                .map(|(s, p)| Some(s? + p? + 1))
                .collect::<Int64Array>(),
        ),
        _ => {
            let s = numeric_column(batch, SIBSP)?.unwrap_or_default();
            let p = numeric_column(batch, PARCH)?.unwrap_or_default();
            Arc::new(
                s.into_iter()
                    .zip(p)
                    .map(|(s, p)| Some(s? + p? + 1.0))
                    .collect::<Float64Array>(),
            )
        }
    };
    set_column(batch, FAMILY_SIZE, family)
}

/// Drop each listed column that exists; unknown names are ignored.
pub fn drop_columns(batch: &RecordBatch, names: &[&str]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if names.contains(&field.name().as_str()) {
            debug!(column = %field.name(), "dropping column");
            continue;
        }
        fields.push(field.clone());
        columns.push(column.clone());
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("creating batch with dropped columns")
}

/// Values of a numeric column as floats; `None` if the column is absent.
fn numeric_column(batch: &RecordBatch, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let column = batch.column(idx);
    let values: Option<Vec<Option<f64>>> = match column.data_type() {
        DataType::Int64 => column
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.iter().map(|v| v.map(|x| x as f64)).collect()),
        DataType::Float64 => column
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.iter().collect()),
        _ => None,
    };
    match values {
        Some(v) => Ok(Some(v)),
        None => bail!("column {} is {}, expected a number", name, column.data_type()),
    }
}

/// Replace `name` in place if it exists, otherwise append it.
fn set_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let field = Arc::new(Field::new(name, array.data_type().clone(), true));
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match schema.index_of(name) {
        Ok(i) => {
            fields[i] = field;
            columns[i] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .with_context(|| format!("adding column {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::StringArray;

    fn batch(fields: Vec<Field>, columns: Vec<ArrayRef>) -> RecordBatch {
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
    }

    #[test]
    fn test_is_child() -> Result<()> {
        let b = batch(
            vec![Field::new(AGE, DataType::Float64, true)],
            vec![Arc::new(Float64Array::from(vec![
                Some(4.0),
                Some(17.9),
                Some(18.0),
                Some(60.0),
                None,
            ]))],
        );
        let out = add_is_child(&b)?;
        let flags = out
            .column_by_name(IS_CHILD)
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(flags.values().to_vec(), vec![1, 1, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_is_child_skipped_without_age() -> Result<()> {
        let b = batch(
            vec![Field::new("fare", DataType::Float64, true)],
            vec![Arc::new(Float64Array::from(vec![7.25]))],
        );
        let out = add_is_child(&b)?;
        assert!(out.column_by_name(IS_CHILD).is_none());
        Ok(())
    }

    #[test]
    fn test_family_size_integer() -> Result<()> {
        let b = batch(
            vec![
                Field::new(SIBSP, DataType::Int64, true),
                Field::new(PARCH, DataType::Int64, true),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1, 0, 3])),
                Arc::new(Int64Array::from(vec![0, 0, 2])),
            ],
        );
        let out = add_family_size(&b)?;
        let size = out
            .column_by_name(FAMILY_SIZE)
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(size.values().to_vec(), vec![2, 1, 6]);
        Ok(())
    }

    #[test]
    fn test_family_size_mixed_types() -> Result<()> {
        let b = batch(
            vec![
                Field::new(SIBSP, DataType::Float64, true),
                Field::new(PARCH, DataType::Int64, true),
            ],
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), None])),
                Arc::new(Int64Array::from(vec![2, 0])),
            ],
        );
        let out = add_family_size(&b)?;
        let size = out
            .column_by_name(FAMILY_SIZE)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(size.value(0), 4.0);
        assert!(size.is_null(1));
        Ok(())
    }

    #[test]
    fn test_family_size_needs_both_columns() -> Result<()> {
        let b = batch(
            vec![Field::new(SIBSP, DataType::Int64, true)],
            vec![Arc::new(Int64Array::from(vec![1]))],
        );
        assert!(add_family_size(&b)?.column_by_name(FAMILY_SIZE).is_none());
        Ok(())
    }

    #[test]
    fn test_derived_column_is_replaced_not_duplicated() -> Result<()> {
        let b = batch(
            vec![
                Field::new(AGE, DataType::Float64, true),
                Field::new(IS_CHILD, DataType::Int64, true),
            ],
            vec![
                Arc::new(Float64Array::from(vec![5.0])),
                Arc::new(Int64Array::from(vec![0])),
            ],
        );
        let out = add_is_child(&b)?;
        assert_eq!(out.num_columns(), 2);
        let flags = out.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(flags.value(0), 1);
        Ok(())
    }

    #[test]
    fn test_drop_columns() -> Result<()> {
        let b = batch(
            vec![
                Field::new("passengerid", DataType::Int64, true),
                Field::new("sex", DataType::Utf8, true),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(StringArray::from(vec!["male"])),
            ],
        );
        let out = drop_columns(&b, DROP_COLUMNS)?;
        assert_eq!(out.num_columns(), 1);
        assert_eq!(out.schema().field(0).name(), "sex");

        let again = drop_columns(&out, DROP_COLUMNS)?;
        assert_eq!(again.num_columns(), 1);
        Ok(())
    }

    #[test]
    fn test_non_numeric_age_is_an_error() {
        let b = batch(
            vec![Field::new(AGE, DataType::Utf8, true)],
            vec![Arc::new(StringArray::from(vec!["young"]))],
        );
        assert!(add_is_child(&b).is_err());
    }
}
