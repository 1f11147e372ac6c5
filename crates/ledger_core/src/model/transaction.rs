//! Transaction domain model.
//!
//! # Responsibility
//! - Define the income/expense record and its display form.
//! - Parse user-supplied amount and kind text.
//!
//! # Invariants
//! - `amount` is finite and `>= 0`.
//! - Display form is `<kind> | <category> | <description> - $<amount>`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Category labels offered to input widgets.
///
/// Purely descriptive: any other label is accepted by the ledger.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Salary",
    "Food",
    "Transportation",
    "Utilities",
    "Entertainment",
    "Other",
];

/// Direction of a transaction. Determines the balance sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Adds to the balance.
    Income,
    /// Subtracts from the balance.
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// Human-readable label, also used in the display form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Applies this kind's sign to a non-negative amount.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind text that matches neither `income` nor `expense`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction kind `{0}`; expected income|expense")]
pub struct UnknownKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(UnknownKind(value.to_string())),
        }
    }
}

/// Amount rejected by parsing or validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("amount `{0}` is not a valid number")]
    NotANumber(String),
    #[error("amount `{0}` is not finite")]
    NotFinite(String),
    #[error("amount must be >= 0, got {0}")]
    Negative(f64),
    #[error("amount `{0}` would overflow the balance")]
    BalanceOverflow(String),
}

/// Parses user-supplied amount text into a validated amount.
///
/// Surrounding whitespace is ignored. `NaN`, infinities and negative values
/// are rejected.
///
/// A finite amount can still be too large to add to the running balance
/// (two incomes of `1e308` sum to infinity); `Ledger` rejects such records
/// with `AmountError::BalanceOverflow`.
pub fn parse_amount(text: &str) -> Result<f64, AmountError> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| AmountError::NotANumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(AmountError::NotFinite(text.to_string()));
    }
    validate_amount(value)?;
    // Normalize `-0` so it renders and sums like zero.
    Ok(value + 0.0)
}

fn validate_amount(value: f64) -> Result<(), AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NotFinite(value.to_string()));
    }
    if value < 0.0 {
        return Err(AmountError::Negative(value));
    }
    Ok(())
}

/// Renders an amount in its natural form: `2000.0`, `45.5`, `0.1`.
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{amount:.1}")
    } else {
        format!("{amount}")
    }
}

/// One recorded income or expense event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Free-text label; no behavior depends on it.
    pub category: String,
    /// Free text, may be empty.
    pub description: String,
    /// Always finite and `>= 0`.
    pub amount: f64,
}

impl Transaction {
    /// Creates a validated transaction.
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Result<Self, AmountError> {
        let transaction = Self {
            kind,
            category: category.into(),
            description: description.into(),
            amount,
        };
        transaction.validate()?;
        Ok(transaction)
    }

    /// Checks the amount invariant. Used on records coming from storage.
    pub fn validate(&self) -> Result<(), AmountError> {
        validate_amount(self.amount)
    }

    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {} - ${}",
            self.kind,
            self.category,
            self.description,
            format_amount(self.amount)
        )
    }
}
