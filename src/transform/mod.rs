// src/transform/mod.rs
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;

use crate::layout::ProjectLayout;

pub mod convert;
pub mod csv_io;
pub mod features;
pub mod impute;
pub mod schema;
pub mod utils;

pub use csv_io::{read_table, write_table};

/// Clean and enrich a typed table: impute gaps, derive features, prune columns.
/// Only columns change; the row count is preserved.
pub fn transform_table(batch: &RecordBatch) -> Result<RecordBatch> {
    let imputed = impute::impute_missing(batch).context("imputing missing values")?;
    let with_child = features::add_is_child(&imputed).context("deriving is_child")?;
    let with_family = features::add_family_size(&with_child).context("deriving family_size")?;
    features::drop_columns(&with_family, features::DROP_COLUMNS)
}

/// Read the raw CSV at `raw_path`, transform it and write
/// `data/staged/<dataset>_transformed.csv`. Returns the staged path.
#[tracing::instrument(level = "info", skip(raw_path, layout), fields(raw = %raw_path.display()))]
pub fn transform_data(raw_path: &Path, dataset: &str, layout: &ProjectLayout) -> Result<PathBuf> {
    let start = Instant::now();
    let staged_path = layout.staged_path(dataset);

    let raw = read_table(raw_path)
        .with_context(|| format!("reading raw data from {}", raw_path.display()))?;
    let staged = transform_table(&raw)?;
    write_table(&staged_path, &staged)?;

    info!(
        rows = staged.num_rows(),
        columns = staged.num_columns(),
        elapsed = ?start.elapsed(),
        "Data transformed and saved to {}",
        staged_path.display()
    );
    Ok(staged_path)
}
