// src/config.rs
use anyhow::{bail, Context, Result};
use std::{env, fmt};
use tracing::debug;
use url::Url;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_KEY";

pub const DEFAULT_TABLE: &str = "titanic_data";
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Credentials for the destination store.
#[derive(Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Settings {
    /// Load `.env` (if any) into the process environment, then read both values.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) => debug!(error = %e, "no .env loaded"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    /// Missing or blank values and a URL that is not http(s) are configuration errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (supabase_url, supabase_key) = match (read(SUPABASE_URL_VAR), read(SUPABASE_KEY_VAR)) {
            (Some(url), Some(key)) => (url, key),
            _ => bail!(
                "Missing {} or {} in .env",
                SUPABASE_URL_VAR,
                SUPABASE_KEY_VAR
            ),
        };
        check_url(&supabase_url)?;

        Ok(Self {
            supabase_url,
            supabase_key,
        })
    }
}

fn check_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .with_context(|| format!("{} is not a valid URL: {}", SUPABASE_URL_VAR, raw))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("{} must be an http(s) URL, got {}", SUPABASE_URL_VAR, raw);
    }
    Ok(())
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"<redacted>")
            .finish()
    }
}

/// Where and how the loader writes.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub table: String,
    pub batch_size: usize,
}

impl LoadOptions {
    /// Rows per insert call; never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_settings_from_lookup() -> Result<()> {
        let settings = Settings::from_lookup(lookup_from(&[
            (SUPABASE_URL_VAR, "https://demo.supabase.co"),
            (SUPABASE_KEY_VAR, " secret "),
        ]))?;
        assert_eq!(settings.supabase_url, "https://demo.supabase.co");
        assert_eq!(settings.supabase_key, "secret");
        Ok(())
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = Settings::from_lookup(lookup_from(&[(
            SUPABASE_URL_VAR,
            "https://demo.supabase.co",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_missing_url_or_blank_value_is_an_error() {
        assert!(Settings::from_lookup(lookup_from(&[(SUPABASE_KEY_VAR, "k")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[
            (SUPABASE_URL_VAR, "   "),
            (SUPABASE_KEY_VAR, "k"),
        ]))
        .is_err());
    }

    #[test]
    fn test_malformed_url_is_a_configuration_error() {
        for bad in ["demo.supabase.co", "not a url", "mailto:ops@example.com"] {
            let err = Settings::from_lookup(lookup_from(&[
                (SUPABASE_URL_VAR, bad),
                (SUPABASE_KEY_VAR, "k"),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains(SUPABASE_URL_VAR), "{}", bad);
        }
    }

    #[test]
    fn test_debug_redacts_key() -> Result<()> {
        let settings = Settings::from_lookup(lookup_from(&[
            (SUPABASE_URL_VAR, "https://demo.supabase.co"),
            (SUPABASE_KEY_VAR, "super-secret"),
        ]))?;
        let shown = format!("{:?}", settings);
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("demo.supabase.co"));
        Ok(())
    }

    #[test]
    fn test_load_options_defaults() {
        let opts = LoadOptions::default();
        assert_eq!(opts.table, "titanic_data");
        assert_eq!(opts.batch_size, 50);
        let zero = LoadOptions {
            batch_size: 0,
            ..LoadOptions::default()
        };
        assert_eq!(zero.effective_batch_size(), 1);
    }
}
