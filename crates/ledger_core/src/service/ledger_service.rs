//! Ledger use-case service.
//!
//! # Responsibility
//! - Provide the submit/balance/display entry points used by UI layers.
//! - Persist the full ledger after every successful append.
//!
//! # Invariants
//! - An unreadable store at startup yields an empty ledger plus a notice.
//! - A failed save keeps the appended record in memory. It is lost if the
//!   process exits before a later save succeeds.

use crate::model::ledger::Ledger;
use crate::model::transaction::{AmountError, Transaction, TransactionKind, UnknownKind};
use crate::store::{LedgerStore, StoreError};
use log::{info, warn};
use thiserror::Error;

/// Rejected submission. The ledger is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidKind(#[from] UnknownKind),
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

/// Accepted submission.
#[derive(Debug)]
pub struct Submitted {
    /// Record appended to the ledger.
    pub transaction: Transaction,
    /// Set when the follow-up save failed.
    pub save_error: Option<StoreError>,
}

/// Owns the ledger and the store it is persisted to.
pub struct LedgerService<S: LedgerStore> {
    ledger: Ledger,
    store: S,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Loads the ledger from `store`.
    ///
    /// Returns the read error as a startup notice when the persisted data is
    /// unreadable; the service then starts empty and the next save
    /// overwrites the unreadable file.
    pub fn open(store: S) -> (Self, Option<StoreError>) {
        let loaded = store.load().and_then(|records| {
            Ledger::from_transactions(records)
                .map_err(|err| StoreError::read(store.location(), err))
        });

        let (ledger, notice) = match loaded {
            Ok(ledger) => {
                info!(
                    "event=service_open module=service status=ok count={}",
                    ledger.len()
                );
                (ledger, None)
            }
            Err(err) => {
                warn!(
                    "event=service_open module=service status=error fallback=empty error={}",
                    err
                );
                (Ledger::new(), Some(err))
            }
        };

        (Self { ledger, store }, notice)
    }

    /// Parses UI text, appends a record and persists the ledger.
    ///
    /// # Errors
    /// - `SubmitError::InvalidKind` when `kind` is not `income|expense`.
    /// - `SubmitError::InvalidAmount` when `amount_text` is not a finite,
    ///   non-negative number.
    ///
    /// Save failures do not fail the submission; see `Submitted::save_error`.
    pub fn submit(
        &mut self,
        kind: &str,
        category: &str,
        description: &str,
        amount_text: &str,
    ) -> Result<Submitted, SubmitError> {
        let kind: TransactionKind = kind.parse()?;
        self.append(kind, category, description, amount_text)
    }

    /// Typed variant of `submit`.
    pub fn append(
        &mut self,
        kind: TransactionKind,
        category: &str,
        description: &str,
        amount_text: &str,
    ) -> Result<Submitted, SubmitError> {
        let transaction = self
            .ledger
            .append(kind, category, description, amount_text)?;
        let save_error = self.save().err();
        Ok(Submitted {
            transaction,
            save_error,
        })
    }

    /// Persists the current ledger.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.ledger)
    }

    pub fn current_balance(&self) -> f64 {
        self.ledger.balance()
    }

    pub fn balance_label(&self) -> String {
        self.ledger.balance_label()
    }

    pub fn display_strings(&self) -> Vec<String> {
        self.ledger.display_strings()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
