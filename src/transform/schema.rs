use crate::transform::utils::{parse_bool, present};
use anyhow::{anyhow, Result};
use arrow::{
    array::StringArray,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};

/// The column types the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Text => DataType::Utf8,
        }
    }

    /// Numeric columns are median-imputed, the rest mode-imputed.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// Pick the narrowest kind every present value of `column` fits.
/// A column with nothing present stays text.
pub fn infer_column_kind(column: &StringArray) -> ColumnKind {
    let mut seen = false;
    let (mut int, mut float, mut boolean) = (true, true, true);

    for value in column.iter().filter_map(present) {
        seen = true;
        int &= value.parse::<i64>().is_ok();
        float &= value.parse::<f64>().is_ok();
        boolean &= parse_bool(value).is_some();
        if !(int || float || boolean) {
            break;
        }
    }

    match (seen, int, float, boolean) {
        (false, ..) => ColumnKind::Text,
        (true, true, ..) => ColumnKind::Integer,
        (true, false, true, _) => ColumnKind::Float,
        (true, false, false, true) => ColumnKind::Boolean,
        _ => ColumnKind::Text,
    }
}

/// Derive the typed schema for an all-text batch, column by column.
pub fn analyze_batch_for_schema(batch: &RecordBatch) -> Result<Schema> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(batch.num_columns());

    for (i, field) in schema.fields().iter().enumerate() {
        let column = batch
            .column(i)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| anyhow!("column {} is not text", field.name()))?;
        let kind = infer_column_kind(column);
        fields.push(Field::new(field.name(), kind.data_type(), true));
    }

    Ok(Schema::new(fields))
}
