//! Single-file JSON ledger store.
//!
//! The file holds one JSON array of transaction records in ledger order.

use super::{LedgerStore, StoreError, StoreResult};
use crate::model::ledger::Ledger;
use crate::model::transaction::Transaction;
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default backing file name, resolved against the working directory.
pub const DEFAULT_DATA_FILE_NAME: &str = "transactions.dat";

/// Ledger store backed by one JSON document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_records(&self) -> StoreResult<Vec<Transaction>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::read(&self.path, err)),
        };

        let records: Vec<Transaction> = serde_json::from_slice(&content)
            .map_err(|err| StoreError::read(&self.path, err))?;
        for record in &records {
            record
                .validate()
                .map_err(|err| StoreError::read(&self.path, err))?;
        }
        Ok(records)
    }

    fn write_records(&self, ledger: &Ledger) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StoreError::write(&self.path, err))?;
            }
        }
        let payload = serde_json::to_vec_pretty(ledger.all())
            .map_err(|err| StoreError::write(&self.path, err))?;
        fs::write(&self.path, payload).map_err(|err| StoreError::write(&self.path, err))
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE_NAME)
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<Transaction>> {
        let started_at = Instant::now();
        match self.read_records() {
            Ok(records) => {
                info!(
                    "event=store_load module=store status=ok count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_records(ledger) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok count={} duration_ms={}",
                    ledger.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
