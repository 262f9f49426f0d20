// src/load/store.rs
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::load::ddl::validate_table_name;
use crate::load::records::Record;

/// Name of the SQL-executing database function exposed over RPC.
pub const EXECUTE_SQL_RPC: &str = "execute_sql";

/// The remote calls the loader depends on.
pub trait TableStore {
    /// Run a statement through the store's SQL procedure.
    fn execute_sql(&self, query: &str) -> Result<()>;

    /// Append `rows` to `table` in a single call.
    fn insert_rows(&self, table: &str, rows: &[Record]) -> Result<()>;
}

#[derive(Serialize)]
struct SqlCall<'a> {
    query: &'a str,
}

/// Supabase project reached through its PostgREST endpoint.
pub struct SupabaseStore {
    client: Client,
    rest: Url,
    key: String,
}

impl SupabaseStore {
    pub fn new(client: Client, settings: &Settings) -> Result<Self> {
        let mut base = settings.supabase_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let rest = Url::parse(&base)
            .with_context(|| format!("parsing store URL {}", settings.supabase_url))?
            .join("rest/v1/")
            .context("building REST endpoint")?;

        Ok(Self {
            client,
            rest,
            key: settings.supabase_key.clone(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(Client::new(), settings)
    }

    pub fn rpc_url(&self, function: &str) -> Result<Url> {
        self.rest
            .join(&format!("rpc/{}", function))
            .with_context(|| format!("building RPC URL for {}", function))
    }

    pub fn table_url(&self, table: &str) -> Result<Url> {
        validate_table_name(table)?;
        self.rest
            .join(table)
            .with_context(|| format!("building URL for table {}", table))
    }

    fn post<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<()> {
        debug!(%url, "POST");
        let resp = self
            .client
            .post(url.clone())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .with_context(|| format!("POST {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            bail!("POST {} returned {}: {}", url, status, text.trim());
        }
        Ok(())
    }
}

impl TableStore for SupabaseStore {
    fn execute_sql(&self, query: &str) -> Result<()> {
        let url = self.rpc_url(EXECUTE_SQL_RPC)?;
        self.post(url, &SqlCall { query })
    }

    fn insert_rows(&self, table: &str, rows: &[Record]) -> Result<()> {
        let url = self.table_url(table)?;
        self.post(url, rows)
    }
}
