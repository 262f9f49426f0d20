// src/load/mod.rs
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::LoadOptions;
use crate::layout::ProjectLayout;
use crate::transform::read_table;

pub mod ddl;
pub mod records;
pub mod store;

pub use records::{batch_to_records, Record};
pub use store::{SupabaseStore, TableStore};

/// Best-effort `CREATE TABLE IF NOT EXISTS` through the store's SQL RPC.
/// Failures are logged and swallowed; loading proceeds as if the table exists.
pub fn create_table_if_not_exists<S: TableStore + ?Sized>(store: &S, table: &str) {
    let sql = match ddl::create_table_sql(table) {
        Ok(sql) => sql,
        Err(e) => {
            error!("Error creating table: {:#}", e);
            warn!("Continuing with data insertion...");
            return;
        }
    };

    match store.execute_sql(&sql) {
        Ok(()) => info!("Table '{}' created or already exists.", table),
        Err(e) => {
            warn!("RPC failed: {:#}", e);
            warn!("Assuming table already exists.");
        }
    }
}

/// Insert the staged CSV into `options.table`, `options.batch_size` rows per call.
///
/// A relative `staged_path` is taken from the project root. A missing file
/// aborts before any remote call. Each batch stands alone: a failed batch is
/// logged and skipped, later batches still run. Outcome is reported in the
/// logs only.
#[tracing::instrument(level = "info", skip_all, fields(table = %options.table))]
pub fn load_to_store<S: TableStore + ?Sized>(
    store: &S,
    staged_path: &Path,
    layout: &ProjectLayout,
    options: &LoadOptions,
) {
    let staged_path = layout.resolve(staged_path);
    info!("Looking for the data file at: {}", staged_path.display());

    if !staged_path.exists() {
        error!("File not found at {}", staged_path.display());
        error!("Run the transform stage first.");
        return;
    }

    if let Err(e) = insert_in_batches(store, &staged_path, options) {
        error!("Error loading data: {:#}", e);
    }
}

fn insert_in_batches<S: TableStore + ?Sized>(
    store: &S,
    staged_path: &Path,
    options: &LoadOptions,
) -> Result<()> {
    let table = read_table(staged_path)
        .with_context(|| format!("reading staged data from {}", staged_path.display()))?;
    let total = table.num_rows();
    let batch_size = options.effective_batch_size();

    info!("Loading {} rows into table '{}'...", total, options.table);

    for (index, offset) in (0..total).step_by(batch_size).enumerate() {
        let len = batch_size.min(total - offset);
        let result = batch_to_records(&table.slice(offset, len))
            .and_then(|rows| store.insert_rows(&options.table, &rows));

        match result {
            Ok(()) => info!("Inserted rows {} – {} of {}", offset + 1, offset + len, total),
            Err(e) => {
                error!("Error in batch {}: {:#}", index + 1, e);
                continue;
            }
        }
    }

    info!("Finished loading data into '{}'.", options.table);
    Ok(())
}
