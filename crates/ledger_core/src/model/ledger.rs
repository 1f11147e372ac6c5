//! Append-only transaction ledger.
//!
//! # Responsibility
//! - Hold transactions in insertion order.
//! - Derive the signed balance and the UI display strings.
//!
//! # Invariants
//! - A rejected append leaves the ledger untouched.
//! - `balance()` is recomputed from all records on every call.
//! - Every prefix of the ledger has a finite balance; a record that would
//!   overflow it is rejected.

use crate::model::transaction::{parse_amount, AmountError, Transaction, TransactionKind};
use log::debug;

/// In-memory ordered collection of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from already-persisted records, validating each one.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, AmountError> {
        let mut balance = 0.0;
        for transaction in &transactions {
            transaction.validate()?;
            balance = next_balance(balance, transaction)?;
        }
        Ok(Self { transactions })
    }

    /// Parses `amount_text` and appends a new record at the end.
    ///
    /// # Errors
    /// - Returns `AmountError` when `amount_text` is not a finite,
    ///   non-negative number, or when adding it would overflow the balance.
    ///   No record is created in that case.
    pub fn append(
        &mut self,
        kind: TransactionKind,
        category: impl Into<String>,
        description: impl Into<String>,
        amount_text: &str,
    ) -> Result<Transaction, AmountError> {
        let amount = parse_amount(amount_text)?;
        let transaction = Transaction::new(kind, category, description, amount)?;
        next_balance(self.balance(), &transaction)
            .map_err(|_| AmountError::BalanceOverflow(amount_text.to_string()))?;
        self.transactions.push(transaction.clone());
        debug!(
            "event=ledger_append module=ledger status=ok kind={} count={}",
            kind,
            self.transactions.len()
        );
        Ok(transaction)
    }

    /// Appends an already-built record after checking its amount.
    pub fn push(&mut self, transaction: Transaction) -> Result<(), AmountError> {
        transaction.validate()?;
        next_balance(self.balance(), &transaction)?;
        self.transactions.push(transaction);
        Ok(())
    }

    /// Income minus expenses, folded in insertion order.
    pub fn balance(&self) -> f64 {
        self.transactions
            .iter()
            .fold(0.0, |balance, transaction| {
                balance + transaction.signed_amount()
            })
    }

    /// Balance label as shown under the list, e.g. `Balance: $1954.50`.
    pub fn balance_label(&self) -> String {
        format_balance_label(self.balance())
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// One list line per record, in insertion order.
    pub fn display_strings(&self) -> Vec<String> {
        self.transactions.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn next_balance(balance: f64, transaction: &Transaction) -> Result<f64, AmountError> {
    let next = balance + transaction.signed_amount();
    if next.is_finite() {
        Ok(next)
    } else {
        Err(AmountError::BalanceOverflow(transaction.amount.to_string()))
    }
}

/// Formats a balance with two decimals: `Balance: $-10.00`.
pub fn format_balance_label(balance: f64) -> String {
    format!("Balance: ${balance:.2}")
}

#[cfg(test)]
mod tests {
    use super::{format_balance_label, Ledger};
    use crate::model::transaction::{AmountError, Transaction, TransactionKind};

    #[test]
    fn empty_ledger_has_zero_balance() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), 0.0);
        assert_eq!(ledger.balance_label(), "Balance: $0.00");
    }

    #[test]
    fn append_rejects_invalid_amount_without_mutation() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionKind::Income, "Salary", "pay", "100")
            .unwrap();

        let err = ledger
            .append(TransactionKind::Expense, "Food", "lunch", "abc")
            .unwrap_err();

        assert_eq!(err, AmountError::NotANumber("abc".to_string()));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), 100.0);
    }

    #[test]
    fn all_is_restartable_and_ordered() {
        let mut ledger = Ledger::new();
        ledger.append(TransactionKind::Income, "a", "", "1").unwrap();
        ledger.append(TransactionKind::Expense, "b", "", "2").unwrap();

        let first: Vec<_> = ledger.iter().map(|t| t.category.clone()).collect();
        let second: Vec<_> = (&ledger).into_iter().map(|t| t.category.clone()).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn from_transactions_rejects_negative_record() {
        let bad = Transaction {
            kind: TransactionKind::Income,
            category: "Salary".to_string(),
            description: String::new(),
            amount: -5.0,
        };
        assert_eq!(
            Ledger::from_transactions(vec![bad]).unwrap_err(),
            AmountError::Negative(-5.0)
        );
    }

    #[test]
    fn append_rejects_amount_that_overflows_balance() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionKind::Income, "Salary", "", "1e308")
            .unwrap();

        let err = ledger
            .append(TransactionKind::Income, "Salary", "", "1e308")
            .unwrap_err();

        assert_eq!(err, AmountError::BalanceOverflow("1e308".to_string()));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), 1e308);
        assert!(!ledger.balance_label().contains("inf"));
    }

    #[test]
    fn large_expense_after_large_income_is_accepted() {
        let mut ledger = Ledger::new();
        ledger
            .append(TransactionKind::Income, "Salary", "", "1e308")
            .unwrap();
        ledger
            .append(TransactionKind::Expense, "Other", "", "1e308")
            .unwrap();
        assert_eq!(ledger.balance(), 0.0);
    }

    #[test]
    fn from_transactions_rejects_overflowing_sequence() {
        let big = Transaction::new(TransactionKind::Expense, "Other", "", 1e308).unwrap();
        let err = Ledger::from_transactions(vec![big.clone(), big]).unwrap_err();
        assert!(matches!(err, AmountError::BalanceOverflow(_)));
    }

    #[test]
    fn balance_label_renders_negative_with_two_decimals() {
        assert_eq!(format_balance_label(-10.0), "Balance: $-10.00");
        assert_eq!(format_balance_label(1954.5), "Balance: $1954.50");
    }
}
