use crate::transform::utils::{parse_bool, present, present_verbatim};
use anyhow::{anyhow, bail, Result};
use arrow::{
    array::{
        Array, ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringArray, StringBuilder,
    },
    datatypes::{DataType, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Convert the all-text batch into the types chosen by schema analysis.
/// Missing tokens become nulls in every column type; text keeps its exact value.
pub fn convert_to_final_types(batch: &RecordBatch, schema: &Schema) -> Result<RecordBatch> {
    if batch.num_columns() != schema.fields().len() {
        bail!(
            "schema has {} fields but batch has {} columns",
            schema.fields().len(),
            batch.num_columns()
        );
    }

    let mut out = Vec::with_capacity(batch.num_columns());

    for (arr, fld) in batch.columns().iter().zip(schema.fields()) {
        let sarr = arr
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| anyhow!("column {} is not text", fld.name()))?;

        let col: ArrayRef = match fld.data_type() {
            DataType::Int64 => {
                let mut b = Int64Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(present(opt).and_then(|s| s.parse().ok()));
                }
                Arc::new(b.finish())
            }
            DataType::Float64 => {
                let mut b = Float64Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(present(opt).and_then(|s| s.parse().ok()));
                }
                Arc::new(b.finish())
            }
            DataType::Boolean => {
                let mut b = BooleanBuilder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(present(opt).and_then(parse_bool));
                }
                Arc::new(b.finish())
            }
            DataType::Utf8 => {
                let mut b = StringBuilder::new();
                for opt in sarr.iter() {
                    b.append_option(present_verbatim(opt));
                }
                Arc::new(b.finish())
            }
            other => bail!("unsupported column type {} for {}", other, fld.name()),
        };
        out.push(col);
    }

    RecordBatch::try_new(Arc::new(schema.clone()), out).map_err(Into::into)
}
