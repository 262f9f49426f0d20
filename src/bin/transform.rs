use anyhow::Result;
use reqwest::blocking::Client;
use titanic_etl::{
    extract::{self, DatasetSource},
    logging, transform, ProjectLayout,
};
use tracing::{error, info};

/// Extracts a fresh raw file, then transforms it.
fn main() -> Result<()> {
    logging::init();
    let layout = ProjectLayout::from_env();
    info!(root = %layout.root().display(), "transform stage");

    let source = extract::HttpDataset::titanic(Client::new())?;
    let raw_path = match extract::extract_data(&source, &layout) {
        Ok(path) => path,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            return Ok(());
        }
    };

    if let Err(e) = transform::transform_data(&raw_path, source.name(), &layout) {
        error!("Transformation failed: {:#}", e);
    }
    Ok(())
}
