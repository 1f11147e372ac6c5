//! Core domain logic for the expense ledger.
//! This crate is the single source of truth for ledger invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::LedgerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ledger::{format_balance_label, Ledger};
pub use model::transaction::{
    format_amount, parse_amount, AmountError, Transaction, TransactionKind, UnknownKind,
    DEFAULT_CATEGORIES,
};
pub use service::ledger_service::{LedgerService, SubmitError, Submitted};
pub use store::{JsonFileStore, LedgerStore, StoreError, StoreFailure, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
