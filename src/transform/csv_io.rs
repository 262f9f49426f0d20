use anyhow::{bail, Context, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder, WriterBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    fs::{self, File},
    io::Cursor,
    path::Path,
    sync::Arc,
};
use tracing::debug;

use crate::layout::ProjectLayout;
use crate::transform::{convert::convert_to_final_types, schema::analyze_batch_for_schema};

const READ_BATCH_ROWS: usize = 8192;

/// Read a headed CSV into a single batch with every column as nullable text.
/// Short rows are padded with nulls.
pub fn read_text_table(path: &Path) -> Result<RecordBatch> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(&data), Some(0))
        .with_context(|| format!("reading header of {}", path.display()))?;
    if header.fields().is_empty() {
        bail!("{} has no header row", path.display());
    }

    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .with_batch_size(READ_BATCH_ROWS)
        .build(Cursor::new(&data))
        .context("creating CSV reader")?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("parsing {}", path.display()))?;
    let table = concat_batches(&schema, &batches).context("concatenating CSV batches")?;

    debug!(path = %path.display(), rows = table.num_rows(), columns = table.num_columns(), "read CSV");
    Ok(table)
}

/// Read a headed CSV and give every column its inferred type.
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    let text = read_text_table(path)?;
    let schema = analyze_batch_for_schema(&text)
        .with_context(|| format!("inferring column types of {}", path.display()))?;
    convert_to_final_types(&text, &schema)
}

/// Write `batch` with a header row, nulls as empty fields, replacing any existing file.
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    ProjectLayout::ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer
        .write(batch)
        .with_context(|| format!("writing CSV to {}", path.display()))?;
    Ok(())
}
