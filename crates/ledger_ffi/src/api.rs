//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the ledger submit/balance/list use cases to Dart via FRB.
//! - Translate core errors into the notices shown by the desktop UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One ledger session per process; reopening at another path replaces it.
//! - A failed save keeps the submitted record in the session.
//! - The load notice is delivered by the first snapshot after opening only.

use ledger_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    JsonFileStore, LedgerConfig, LedgerService, SubmitError, TransactionKind, DEFAULT_CATEGORIES,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const INVALID_AMOUNT_MESSAGE: &str = "Enter a valid amount.";
const SAVE_FAILED_MESSAGE: &str = "Error saving transactions.";
const LOAD_FAILED_MESSAGE: &str = "Error loading transactions.";

static SESSION: OnceLock<Mutex<Option<LedgerSession>>> = OnceLock::new();

/// Open ledger plus the load notice not yet shown to the UI.
pub(crate) struct LedgerSession {
    service: LedgerService<JsonFileStore>,
    data_path: PathBuf,
    load_notice: Option<String>,
}

impl LedgerSession {
    pub(crate) fn open(config: &LedgerConfig) -> Self {
        let (service, notice) = LedgerService::open(config.open_store());
        let load_notice = notice.map(|err| {
            warn!("event=ffi_open module=ffi status=error error={err}");
            LOAD_FAILED_MESSAGE.to_string()
        });
        Self {
            service,
            data_path: config.data_path.clone(),
            load_notice,
        }
    }

    /// Current state; hands over the pending load notice, if any.
    pub(crate) fn snapshot(&mut self) -> LedgerSnapshot {
        LedgerSnapshot {
            items: self.service.display_strings(),
            balance: self.service.current_balance(),
            balance_label: self.service.balance_label(),
            message: self.load_notice.take().unwrap_or_default(),
        }
    }

    pub(crate) fn submit(
        &mut self,
        kind: &str,
        category: &str,
        description: &str,
        amount_text: &str,
    ) -> LedgerActionResponse {
        match self.service.submit(kind, category, description, amount_text) {
            Ok(submitted) => {
                let message = match submitted.save_error {
                    Some(err) => {
                        warn!("event=ffi_submit module=ffi status=error error={err}");
                        SAVE_FAILED_MESSAGE.to_string()
                    }
                    None => "Transaction added.".to_string(),
                };
                LedgerActionResponse {
                    ok: true,
                    item: Some(submitted.transaction.to_string()),
                    balance_label: self.service.balance_label(),
                    message,
                }
            }
            Err(SubmitError::InvalidAmount(_)) => {
                self.failure(INVALID_AMOUNT_MESSAGE.to_string())
            }
            Err(err @ SubmitError::InvalidKind(_)) => self.failure(err.to_string()),
        }
    }

    fn failure(&self, message: String) -> LedgerActionResponse {
        LedgerActionResponse {
            ok: false,
            item: None,
            balance_label: self.service.balance_label(),
            message,
        }
    }
}

/// Full state needed to render the list and balance label.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    /// One display line per transaction, in insertion order.
    pub items: Vec<String>,
    /// Signed balance.
    pub balance: f64,
    /// `Balance: $<two decimals>`.
    pub balance_label: String,
    /// Load notice on the first snapshot after opening; empty afterwards
    /// and when the ledger loaded cleanly.
    pub message: String,
}

/// Result envelope for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerActionResponse {
    /// Whether the record was appended.
    pub ok: bool,
    /// Display line of the appended record.
    pub item: Option<String>,
    /// Balance label after the call.
    pub balance_label: String,
    /// Human-readable notice for the UI.
    pub message: String,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the ledger session and returns its initial state.
///
/// `data_path` is normally an app-support file chosen by the UI. When
/// blank or `None`, `LEDGER_DATA_PATH` and then `transactions.dat` apply.
///
/// # FFI contract
/// - Reopening the path already open returns the current state unchanged.
/// - A corrupt store opens empty with `message` set.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_open(data_path: Option<String>) -> LedgerSnapshot {
    let config = resolve_config(data_path);

    let mut guard = lock_session();
    if let Some(session) = guard.as_mut() {
        if session.data_path == config.data_path {
            return session.snapshot();
        }
    }

    let mut session = LedgerSession::open(&config);
    let snapshot = session.snapshot();
    *guard = Some(session);
    snapshot
}

/// Records one transaction from the input form.
///
/// # FFI contract
/// - Opens the default session first when none is open.
/// - `ok=false` with "Enter a valid amount." when `amount_text` is invalid.
/// - `ok=true` with "Error saving transactions." when persistence failed.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_submit(
    kind: String,
    category: String,
    description: String,
    amount_text: String,
) -> LedgerActionResponse {
    with_session(|session| session.submit(&kind, &category, &description, &amount_text))
}

/// Returns the current list lines, balance and any undelivered load notice.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_snapshot() -> LedgerSnapshot {
    with_session(|session| session.snapshot())
}

/// Returns the current signed balance.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_balance() -> f64 {
    with_session(|session| session.service.current_balance())
}

/// Kind labels for the type selector.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_kinds() -> Vec<String> {
    TransactionKind::ALL
        .iter()
        .map(|kind| kind.label().to_string())
        .collect()
}

/// Default category labels for the category selector.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_categories() -> Vec<String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|category| category.to_string())
        .collect()
}

fn lock_session() -> MutexGuard<'static, Option<LedgerSession>> {
    let cell = SESSION.get_or_init(|| Mutex::new(None));
    // A poisoned lock only means an earlier call panicked; the ledger is still usable.
    cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Explicit path, then `LEDGER_DATA_PATH`, then the default file.
fn resolve_config(data_path: Option<String>) -> LedgerConfig {
    let explicit = data_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from);
    LedgerConfig::resolve(explicit, |key| std::env::var(key).ok())
}

fn with_session<T>(f: impl FnOnce(&mut LedgerSession) -> T) -> T {
    let mut guard = lock_session();
    let session = guard.get_or_insert_with(|| LedgerSession::open(&resolve_config(None)));
    f(session)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ledger_balance, ledger_categories, ledger_kinds, ledger_open,
        ledger_snapshot, ledger_submit, ping, resolve_config, LedgerSession,
    };
    use ledger_core::LedgerConfig;
    use std::fs;
    use std::path::PathBuf;

    fn session_at(path: PathBuf) -> LedgerSession {
        LedgerSession::open(&LedgerConfig::resolve(Some(path), |_| None))
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn selectors_expose_kinds_and_default_categories() {
        assert_eq!(ledger_kinds(), vec!["Income", "Expense"]);
        assert_eq!(ledger_categories().len(), 6);
        assert_eq!(ledger_categories()[0], "Salary");
    }

    #[test]
    fn session_submit_reports_invalid_amount() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(dir.path().join("transactions.dat"));

        let response = session.submit("Expense", "Food", "lunch", "abc");

        assert!(!response.ok);
        assert_eq!(response.message, "Enter a valid amount.");
        assert_eq!(response.balance_label, "Balance: $0.00");
        assert!(session.snapshot().items.is_empty());
    }

    #[test]
    fn session_submit_reports_save_failure_but_keeps_record() {
        let dir = tempfile::tempdir().unwrap();
        // Target path is a directory, so every save fails.
        let mut session = session_at(dir.path().to_path_buf());

        let response = session.submit("Expense", "Other", "", "10");

        assert!(response.ok);
        assert_eq!(response.message, "Error saving transactions.");
        assert_eq!(response.item.as_deref(), Some("Expense | Other |  - $10.0"));
        assert_eq!(session.snapshot().balance, -10.0);
    }

    #[test]
    fn session_open_reports_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.dat");
        fs::write(&path, "garbage").unwrap();

        let snapshot = session_at(path).snapshot();

        assert_eq!(snapshot.message, "Error loading transactions.");
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.balance_label, "Balance: $0.00");
    }

    #[test]
    fn load_notice_is_delivered_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.dat");
        fs::write(&path, "garbage").unwrap();
        let mut session = session_at(path);

        assert_eq!(session.snapshot().message, "Error loading transactions.");
        let later = session.snapshot();
        assert!(later.message.is_empty());
        assert!(later.items.is_empty());

        let response = session.submit("Income", "Salary", "", "5");
        assert_eq!(response.message, "Transaction added.");
        assert!(session.snapshot().message.is_empty());
    }

    #[test]
    fn blank_open_path_resolves_like_default_session() {
        let from_env = LedgerConfig::from_env();
        assert_eq!(resolve_config(None), from_env);
        assert_eq!(resolve_config(Some("   ".to_string())), from_env);
        assert_eq!(
            resolve_config(Some(" /tmp/ledger.dat ".to_string())).data_path,
            PathBuf::from("/tmp/ledger.dat")
        );
    }

    #[test]
    fn global_session_flow_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.dat");
        let path_text = path.to_str().unwrap().to_string();

        let opened = ledger_open(Some(path_text.clone()));
        assert!(opened.items.is_empty());
        assert!(opened.message.is_empty());

        let first = ledger_submit(
            "Income".to_string(),
            "Salary".to_string(),
            "March pay".to_string(),
            "2000.0".to_string(),
        );
        assert!(first.ok, "{}", first.message);
        let second = ledger_submit(
            "Expense".to_string(),
            "Food".to_string(),
            "Groceries".to_string(),
            "45.5".to_string(),
        );
        assert_eq!(second.balance_label, "Balance: $1954.50");
        assert_eq!(ledger_balance(), 1954.5);

        let snapshot = ledger_snapshot();
        assert_eq!(
            snapshot.items,
            vec![
                "Income | Salary | March pay - $2000.0",
                "Expense | Food | Groceries - $45.5",
            ]
        );

        let reopened = session_at(path).snapshot();
        assert_eq!(reopened.items, snapshot.items);
    }
}
