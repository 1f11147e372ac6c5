//! Runtime configuration for the ledger backing file.
//!
//! # Responsibility
//! - Resolve the data path from an explicit value, env, or the default.
//! - Build the `JsonFileStore` for that path.
//!
//! # Invariants
//! - Explicit value wins over env, env wins over the default.
//! - Blank values are treated as unset.
//! - Resolution cannot fail; every input maps to a usable path.

use crate::store::{JsonFileStore, DEFAULT_DATA_FILE_NAME};
use std::path::PathBuf;

/// Env var overriding the backing file path.
pub const DATA_PATH_ENV: &str = "LEDGER_DATA_PATH";

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub data_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE_NAME),
        }
    }
}

impl LedgerConfig {
    /// Resolves configuration from process env, falling back to defaults.
    pub fn from_env() -> Self {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an explicit path override.
    ///
    /// `lookup` reads env-like values; injected so callers and tests do not
    /// depend on process-global state.
    pub fn resolve(data_path: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = data_path
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| non_blank(lookup(DATA_PATH_ENV)).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE_NAME));

        Self { data_path }
    }

    /// Builds the store for this configuration.
    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.data_path.clone())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
