use anyhow::Result;
use titanic_etl::{
    extract::dataset::TITANIC,
    load::{self, SupabaseStore},
    logging, LoadOptions, ProjectLayout, Settings,
};
use tracing::{error, info};

fn main() -> Result<()> {
    logging::init();
    let layout = ProjectLayout::from_env();
    info!(root = %layout.root().display(), "load stage");

    // missing or malformed credentials are the one fatal error
    let settings = Settings::from_env()?;
    let store = match SupabaseStore::from_settings(&settings) {
        Ok(store) => store,
        Err(e) => {
            error!("Store setup failed: {:#}", e);
            return Ok(());
        }
    };
    let options = LoadOptions::default();

    load::create_table_if_not_exists(&store, &options.table);
    load::load_to_store(&store, &layout.staged_path(TITANIC), &layout, &options);
    Ok(())
}
