//! Persistence boundary between the ledger and durable storage.
//!
//! # Responsibility
//! - Define the whole-ledger save/load contract.
//! - Provide the JSON-file implementation.
//!
//! # Invariants
//! - `save` overwrites the full persisted sequence in one shot.
//! - `save` never mutates the in-memory ledger, even on failure.
//! - `load` on a missing backing file returns an empty sequence.
//! - `load` on unreadable data returns `StoreError::Read`.

use crate::model::ledger::Ledger;
use crate::model::transaction::{AmountError, Transaction};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod json_file;

pub use json_file::{JsonFileStore, DEFAULT_DATA_FILE_NAME};

pub type StoreResult<T> = Result<T, StoreError>;

/// Underlying cause of a store failure.
#[derive(Debug, Error)]
pub enum StoreFailure {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid persisted transaction: {0}")]
    InvalidRecord(#[from] AmountError),
}

/// Save or load failure, tagged with the backing location.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read transactions from `{location}`: {source}", location = .path.display())]
    Read { path: PathBuf, source: StoreFailure },
    #[error("failed to write transactions to `{location}`: {source}", location = .path.display())]
    Write { path: PathBuf, source: StoreFailure },
}

impl StoreError {
    pub(crate) fn read(path: &Path, source: impl Into<StoreFailure>) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: &Path, source: impl Into<StoreFailure>) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Whole-ledger persistence contract.
pub trait LedgerStore {
    /// Restores the persisted sequence in its saved order.
    fn load(&self) -> StoreResult<Vec<Transaction>>;
    /// Overwrites the persisted sequence with every record in `ledger`.
    fn save(&self, ledger: &Ledger) -> StoreResult<()>;
    /// Backing file location, for diagnostics.
    fn location(&self) -> &Path;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn load(&self) -> StoreResult<Vec<Transaction>> {
        (**self).load()
    }

    fn save(&self, ledger: &Ledger) -> StoreResult<()> {
        (**self).save(ledger)
    }

    fn location(&self) -> &Path {
        (**self).location()
    }
}
