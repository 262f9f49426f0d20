use anyhow::Result;
use reqwest::blocking::Client;
use std::time::Instant;
use titanic_etl::{
    extract::{self, DatasetSource},
    load::{self, SupabaseStore},
    logging, transform, LoadOptions, ProjectLayout, Settings,
};
use tracing::{error, info};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    info!("startup");
    let start = Instant::now();

    // ─── 2) configuration ────────────────────────────────────────────
    let layout = ProjectLayout::from_env();
    info!(root = %layout.root().display(), "project root");
    let settings = Settings::from_env()?;
    let store = match SupabaseStore::from_settings(&settings) {
        Ok(store) => store,
        Err(e) => {
            error!("Store setup failed: {:#}", e);
            return Ok(());
        }
    };
    let options = LoadOptions::default();

    // ─── 3) extract ──────────────────────────────────────────────────
    let source = extract::HttpDataset::titanic(Client::new())?;
    let raw_path = match extract::extract_data(&source, &layout) {
        Ok(path) => path,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            return Ok(());
        }
    };

    // ─── 4) transform ────────────────────────────────────────────────
    let staged_path = match transform::transform_data(&raw_path, source.name(), &layout) {
        Ok(path) => path,
        Err(e) => {
            error!("Transformation failed: {:#}", e);
            return Ok(());
        }
    };

    // ─── 5) load ─────────────────────────────────────────────────────
    load::create_table_if_not_exists(&store, &options.table);
    load::load_to_store(&store, &staged_path, &layout, &options);

    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
