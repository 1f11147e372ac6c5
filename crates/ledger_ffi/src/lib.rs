//! Flutter bridge for the ledger core.

pub mod api;
