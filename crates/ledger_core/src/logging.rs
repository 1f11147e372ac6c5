//! Ledger logging bootstrap.
//!
//! # Responsibility
//! - Route `log` events from the ledger crates to rolling files.
//! - Record panics so a crashed session leaves a trace next to the ledger logs.
//!
//! # Invariants
//! - Init is idempotent for the same settings; different settings are rejected.
//! - Init never panics.
//! - Amounts, categories and descriptions are user data and never logged,
//!   including through panic payloads.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "ledger";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    settings: LogSettings,
    _logger: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log_dir cannot be empty")]
    EmptyDir,
    #[error("log_dir must be an absolute path, got `{0}`")]
    RelativeDir(String),
    #[error("failed to create log directory `{dir}`: {reason}")]
    CreateDir { dir: String, reason: String },
    #[error("failed to start logger: {0}")]
    Backend(String),
    #[error("logging already initialized with level `{active}`; refusing to switch to `{requested}`")]
    LevelConflict {
        active: &'static str,
        requested: &'static str,
    },
    #[error("logging already initialized at `{active}`; refusing to switch to `{requested}`")]
    DirConflict { active: String, requested: String },
}

/// Validated `level + log_dir` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    log_dir: PathBuf,
}

impl LogSettings {
    /// Accepts level names case-insensitively (`warning` is `warn`) and
    /// requires an absolute directory.
    fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let requested = level.trim().to_ascii_lowercase();
        let requested = if requested == "warning" {
            "warn".to_string()
        } else {
            requested
        };
        let level = LEVELS
            .iter()
            .copied()
            .find(|known| *known == requested)
            .ok_or(LoggingError::UnsupportedLevel(requested))?;

        let log_dir = log_dir.trim();
        if log_dir.is_empty() {
            return Err(LoggingError::EmptyDir);
        }
        let log_dir = PathBuf::from(log_dir);
        if !log_dir.is_absolute() {
            return Err(LoggingError::RelativeDir(log_dir.display().to_string()));
        }

        Ok(Self { level, log_dir })
    }

    fn ensure_matches(&self, requested: &LogSettings) -> Result<(), LoggingError> {
        if self.log_dir != requested.log_dir {
            return Err(LoggingError::DirConflict {
                active: self.log_dir.display().to_string(),
                requested: requested.log_dir.display().to_string(),
            });
        }
        if self.level != requested.level {
            return Err(LoggingError::LevelConflict {
                active: self.level,
                requested: requested.level,
            });
        }
        Ok(())
    }
}

/// Starts rolling file logs under `log_dir` at `level`.
///
/// # Errors
/// - Unsupported `level`, empty or relative `log_dir`.
/// - Directory creation or logger backend failure.
/// - A previous successful call used a different level or directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(requested.clone()))?;
    state.settings.ensure_matches(&requested)
}

fn start_logger(settings: LogSettings) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|err| LoggingError::CreateDir {
        dir: settings.log_dir.display().to_string(),
        reason: err.to_string(),
    })?;

    let logger = Logger::try_with_str(settings.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(&settings.log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();
    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        settings.level,
        settings.log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        settings,
        _logger: logger,
    })
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.settings.level, state.settings.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payloads can quote a description or amount; only the location is kept.
        error!(
            "event=panic module=logging status=error location={}",
            panic_location(panic_info.location())
        );
        previous_hook(panic_info);
    }));
}

fn panic_location(location: Option<&std::panic::Location<'_>>) -> String {
    location
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, panic_location, LogSettings, LoggingError};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_log_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledger-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    fn absolute(dir: &str) -> String {
        std::env::temp_dir().join(dir).display().to_string()
    }

    #[test]
    fn parse_accepts_known_levels_case_insensitively() {
        let dir = absolute("ledger-logs");
        assert_eq!(LogSettings::parse("INFO", &dir).unwrap().level, "info");
        assert_eq!(LogSettings::parse(" warning ", &dir).unwrap().level, "warn");
        assert_eq!(
            LogSettings::parse("verbose", &dir).unwrap_err(),
            LoggingError::UnsupportedLevel("verbose".to_string())
        );
    }

    #[test]
    fn parse_rejects_empty_and_relative_dirs() {
        assert_eq!(
            LogSettings::parse("info", "  ").unwrap_err(),
            LoggingError::EmptyDir
        );
        assert_eq!(
            LogSettings::parse("info", "logs/dev").unwrap_err(),
            LoggingError::RelativeDir("logs/dev".to_string())
        );
    }

    #[test]
    fn settings_conflicts_name_the_active_value() {
        let active = LogSettings::parse("info", &absolute("a")).unwrap();

        let err = active
            .ensure_matches(&LogSettings::parse("debug", &absolute("a")).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            LoggingError::LevelConflict {
                active: "info",
                requested: "debug"
            }
        );

        let err = active
            .ensure_matches(&LogSettings::parse("info", &absolute("b")).unwrap())
            .unwrap_err();
        assert!(matches!(err, LoggingError::DirConflict { .. }));
    }

    #[test]
    fn panic_location_falls_back_to_unknown() {
        assert_eq!(panic_location(None), "unknown");
        let here = std::panic::Location::caller();
        assert!(panic_location(Some(here)).contains("logging.rs:"));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let log_dir = unique_log_dir("idempotent");
        let log_dir_str = log_dir.to_str().unwrap().to_string();
        let other_dir_str = unique_log_dir("other").to_str().unwrap().to_string();

        init_logging("info", &log_dir_str).expect("first init should succeed");
        init_logging(" INFO ", &log_dir_str).expect("same config should be idempotent");

        let level_error = init_logging("debug", &log_dir_str).unwrap_err();
        assert!(matches!(level_error, LoggingError::LevelConflict { .. }));

        let dir_error = init_logging("info", &other_dir_str).unwrap_err();
        assert!(dir_error.to_string().contains("refusing to switch"));

        let (active_level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(active_level, "info");
        assert_eq!(active_dir, log_dir);
    }
}
