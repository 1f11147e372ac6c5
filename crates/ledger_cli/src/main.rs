//! Terminal front-end for the ledger core.
//!
//! # Responsibility
//! - Drive the same submit/balance/list use cases as the desktop UI.
//! - Surface load/save notices on stderr without aborting.

use clap::{Parser, Subcommand};
use ledger_core::{
    default_log_level, init_logging, JsonFileStore, LedgerConfig, LedgerService, SubmitError,
    DEFAULT_CATEGORIES,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ledger", about = "Record income and expenses and show the balance")]
struct Cli {
    /// Backing file for the ledger.
    #[arg(long, global = true, env = "LEDGER_DATA_PATH")]
    data_path: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "LEDGER_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "LEDGER_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record one transaction.
    Add {
        /// income|expense
        #[arg(long)]
        kind: String,
        #[arg(long, default_value = "Other")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Non-negative amount, e.g. 45.5
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    /// Print every transaction and the balance.
    List,
    /// Print the balance label.
    Balance,
    /// Print the default categories.
    Categories,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match cli.command {
        Command::Categories => {
            for category in DEFAULT_CATEGORIES {
                println!("{category}");
            }
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("ledger_core version={}", ledger_core::core_version());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let config = LedgerConfig::resolve(cli.data_path, |_| None);
    info!(
        "event=cli_start module=cli status=ok data_path={}",
        config.data_path.display()
    );

    let (mut service, notice) = LedgerService::open(config.open_store());
    if let Some(err) = notice {
        eprintln!("Error loading transactions: {err}");
    }

    run(&mut service, cli.command)
}

fn run(service: &mut LedgerService<JsonFileStore>, command: Command) -> ExitCode {
    match command {
        Command::Add {
            kind,
            category,
            description,
            amount,
        } => match service.submit(&kind, &category, &description, &amount) {
            Ok(submitted) => {
                println!("{}", submitted.transaction);
                if let Some(err) = submitted.save_error {
                    eprintln!("Error saving transactions: {err}");
                }
                println!("{}", service.balance_label());
                ExitCode::SUCCESS
            }
            Err(SubmitError::InvalidAmount(_)) => {
                eprintln!("Enter a valid amount.");
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
        Command::List => {
            for line in service.display_strings() {
                println!("{line}");
            }
            println!("{}", service.balance_label());
            ExitCode::SUCCESS
        }
        Command::Balance => {
            println!("{}", service.balance_label());
            ExitCode::SUCCESS
        }
        Command::Categories | Command::Version => ExitCode::SUCCESS,
    }
}
