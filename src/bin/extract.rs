use anyhow::Result;
use reqwest::blocking::Client;
use titanic_etl::{extract, logging, ProjectLayout};
use tracing::{error, info};

fn main() -> Result<()> {
    logging::init();
    let layout = ProjectLayout::from_env();
    info!(root = %layout.root().display(), "extract stage");

    let source = extract::HttpDataset::titanic(Client::new())?;
    if let Err(e) = extract::extract_data(&source, &layout) {
        error!("Extraction failed: {:#}", e);
    }
    Ok(())
}
