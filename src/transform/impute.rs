use anyhow::Result;
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

/// Median of the present values; mean of the middle pair for even counts.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    values.retain(|v| !v.is_nan());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent value; ties go to the smallest.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Fill nulls: median for numeric columns, mode for text and boolean ones.
/// Integer columns with gaps are widened to float first.
pub fn impute_missing(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if column.null_count() == 0 {
            fields.push(field.clone());
            columns.push(column.clone());
            continue;
        }

        let filled = match field.data_type() {
            DataType::Int64 => column
                .as_any()
                .downcast_ref::<Int64Array>()
                .and_then(fill_int_with_median),
            DataType::Float64 => column
                .as_any()
                .downcast_ref::<Float64Array>()
                .and_then(fill_float_with_median),
            DataType::Utf8 => column
                .as_any()
                .downcast_ref::<StringArray>()
                .and_then(fill_text_with_mode),
            DataType::Boolean => column
                .as_any()
                .downcast_ref::<BooleanArray>()
                .and_then(fill_bool_with_mode),
            _ => None,
        };

        match filled {
            Some(array) => {
                debug!(column = %field.name(), filled = column.null_count(), "imputed");
                fields.push(Arc::new(Field::new(
                    field.name(),
                    array.data_type().clone(),
                    true,
                )));
                columns.push(array);
            }
            None => {
                debug!(column = %field.name(), "nothing to impute from");
                fields.push(field.clone());
                columns.push(column.clone());
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

fn fill_int_with_median(arr: &Int64Array) -> Option<ArrayRef> {
    let m = median(arr.iter().flatten().map(|v| v as f64).collect())?;
    let filled: Float64Array = arr
        .iter()
        .map(|v| Some(v.map_or(m, |x| x as f64)))
        .collect();
    Some(Arc::new(filled))
}

fn fill_float_with_median(arr: &Float64Array) -> Option<ArrayRef> {
    let m = median(arr.iter().flatten().collect())?;
    let filled: Float64Array = arr.iter().map(|v| Some(v.unwrap_or(m))).collect();
    Some(Arc::new(filled))
}

fn fill_text_with_mode(arr: &StringArray) -> Option<ArrayRef> {
    let m = mode(arr.iter().flatten())?.to_string();
    let filled: StringArray = arr
        .iter()
        .map(|v| Some(v.unwrap_or(m.as_str())))
        .collect();
    Some(Arc::new(filled))
}

fn fill_bool_with_mode(arr: &BooleanArray) -> Option<ArrayRef> {
    let m = mode(arr.iter().flatten())?;
    let filled: BooleanArray = arr.iter().map(|v| Some(v.unwrap_or(m))).collect();
    Some(Arc::new(filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![f64::NAN, 5.0]), Some(5.0));
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(vec!["S", "C", "S", "Q"]), Some("S"));
        assert_eq!(mode(vec!["S", "C", "C", "S"]), Some("C"));
        assert_eq!(mode(Vec::<&str>::new()), None);
        assert_eq!(mode(vec![true, false]), Some(false));
    }

    #[test]
    fn test_impute_columns() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("sibsp", DataType::Int64, true),
            Field::new("age", DataType::Float64, true),
            Field::new("embarked", DataType::Utf8, true),
            Field::new("alone", DataType::Boolean, true),
            Field::new("pclass", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![Some(1), None, Some(2), Some(5)])),
                Arc::new(Float64Array::from(vec![Some(30.0), None, Some(10.0), None])),
                Arc::new(StringArray::from(vec![Some("S"), None, Some("C"), Some("S")])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(true), None, Some(false)])),
                Arc::new(Int64Array::from(vec![3, 1, 2, 3])),
            ],
        )?;

        let out = impute_missing(&batch)?;
        assert_eq!(out.num_rows(), 4);
        for col in out.columns() {
            assert_eq!(col.null_count(), 0);
        }

        let sibsp = out.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(sibsp.value(1), 2.0);
        let age = out.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(age.value(1), 20.0);
        assert_eq!(age.value(3), 20.0);
        let embarked = out.column(2).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(embarked.value(1), "S");
        let alone = out.column(3).as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(alone.value(2));

        // complete integer columns keep their type
        assert_eq!(out.schema().field(4).data_type(), &DataType::Int64);
        Ok(())
    }

    #[test]
    fn test_all_null_column_is_left_alone() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new("deck", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec![None::<&str>, None]))],
        )?;
        let out = impute_missing(&batch)?;
        assert_eq!(out.column(0).null_count(), 2);
        Ok(())
    }
}
