//! Ledger domain model.
//!
//! # Responsibility
//! - Define the transaction record shared by UI, ledger and stores.
//! - Own the append-only ledger and its derived balance.
//!
//! # Invariants
//! - Every stored amount is finite and non-negative; `kind` carries the sign.
//! - Records are never edited or removed once appended.

pub mod ledger;
pub mod transaction;
