//! Viewer configuration: which columns to show and filter, paging and
//! debounce timing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_DATA_PATH: &str = "dataset_large.csv";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// A table column: header label and the CSV field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDef {
    pub label: String,
    pub key: String,
}

impl ColumnDef {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        ColumnDef {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// Columns of the bundled modulo dataset.
pub fn default_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("Number", "number"),
        ColumnDef::new("Modulo 350", "mod350"),
        ColumnDef::new("Modulo 8000", "mod8000"),
        ColumnDef::new("Modulo 20002", "mod20002"),
    ]
}

/// Read a JSON array of `{"label": ..., "key": ...}` objects.
pub fn load_columns(path: &Path) -> Result<Vec<ColumnDef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read column file: {}", path.display()))?;
    let columns: Vec<ColumnDef> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse column file: {}", path.display()))?;

    if columns.is_empty() {
        bail!("Column file {} defines no columns", path.display());
    }
    if let Some(col) = columns.iter().find(|c| c.key.is_empty()) {
        bail!("Column {:?} in {} has an empty key", col.label, path.display());
    }
    Ok(columns)
}

/// Everything the viewer needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub columns: Vec<ColumnDef>,
    pub page_size: usize,
    pub debounce: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            columns: default_columns(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl AppConfig {
    /// Build a config, reading columns from `columns_file` when given.
    pub fn new(
        data_path: PathBuf,
        columns_file: Option<&Path>,
        page_size: usize,
        debounce_ms: u64,
    ) -> Result<Self> {
        if page_size == 0 {
            bail!("Page size must be at least 1");
        }
        let columns = match columns_file {
            Some(path) => load_columns(path)?,
            None => default_columns(),
        };
        Ok(AppConfig {
            data_path,
            columns,
            page_size,
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}
