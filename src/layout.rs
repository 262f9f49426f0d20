// src/layout.rs
use anyhow::{Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Overrides the project root for every stage.
pub const ROOT_VAR: &str = "TITANIC_ETL_ROOT";

const RAW_DIR: &str = "data/raw";
const STAGED_DIR: &str = "data/staged";

/// Fixed on-disk layout of the pipeline, anchored at the project root.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$TITANIC_ETL_ROOT` if set, else the crate directory.
    pub fn from_env() -> Self {
        let root = env::var_os(ROOT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    pub fn staged_dir(&self) -> PathBuf {
        self.root.join(STAGED_DIR)
    }

    /// `data/raw/<name>_raw.csv`
    pub fn raw_path(&self, dataset: &str) -> PathBuf {
        self.raw_dir().join(format!("{}_raw.csv", dataset))
    }

    /// `data/staged/<name>_transformed.csv`
    pub fn staged_path(&self, dataset: &str) -> PathBuf {
        self.staged_dir().join(format!("{}_transformed.csv", dataset))
    }

    /// Relative paths are taken from the project root; absolute ones pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Create the parent directory of `path` (and its ancestors).
    pub fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        Ok(())
    }
}
