// src/extract/dataset.rs
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

/// Where seaborn's `load_dataset` pulls its sample tables from.
pub const SEABORN_DATA_BASE: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/";

pub const TITANIC: &str = "titanic";

/// A tabular dataset that can be fetched as raw CSV bytes.
pub trait DatasetSource {
    /// Short name; also the stem of the raw and staged files.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<Vec<u8>>;
}

/// One CSV from the seaborn sample-data repository.
pub struct HttpDataset {
    client: Client,
    name: String,
    url: Url,
}

impl HttpDataset {
    pub fn new(client: Client, name: &str) -> Result<Self> {
        let base = Url::parse(SEABORN_DATA_BASE)
            .with_context(|| format!("parsing dataset base URL {}", SEABORN_DATA_BASE))?;
        let url = base
            .join(&format!("{}.csv", name))
            .with_context(|| format!("building URL for dataset {}", name))?;
        Ok(Self {
            client,
            name: name.to_string(),
            url,
        })
    }

    pub fn titanic(client: Client) -> Result<Self> {
        Self::new(client, TITANIC)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl DatasetSource for HttpDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        debug!(url = %self.url, "fetching dataset");
        let bytes = self
            .client
            .get(self.url.clone())
            .send()
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", self.url))?
            .bytes()
            .with_context(|| format!("reading body from {}", self.url))?;
        Ok(bytes.to_vec())
    }
}
