//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate ledger and store calls into UI-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod ledger_service;
