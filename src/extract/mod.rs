// src/extract/mod.rs
use anyhow::{Context, Result};
use std::{fs, path::PathBuf, time::Instant};
use tracing::info;

use crate::layout::ProjectLayout;

pub mod dataset;

pub use dataset::{DatasetSource, HttpDataset};

/// Fetch `source` and write it byte-for-byte to `data/raw/<name>_raw.csv`,
/// replacing whatever was there. Returns the written path.
#[tracing::instrument(level = "info", skip_all, fields(dataset = %source.name()))]
pub fn extract_data<S: DatasetSource + ?Sized>(
    source: &S,
    layout: &ProjectLayout,
) -> Result<PathBuf> {
    let start = Instant::now();
    let raw_path = layout.raw_path(source.name());
    ProjectLayout::ensure_parent(&raw_path)?;

    let bytes = source
        .fetch()
        .with_context(|| format!("loading dataset {}", source.name()))?;
    fs::write(&raw_path, &bytes)
        .with_context(|| format!("writing raw data to {}", raw_path.display()))?;

    info!(bytes = bytes.len(), elapsed = ?start.elapsed(), "Data extracted and saved to {}", raw_path.display());
    Ok(raw_path)
}
