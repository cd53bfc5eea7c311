//! Domain model for a ledger transaction.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Payment,
    Debt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub student_id: String,
    /// Snapshot of the student's name at write time
    pub student_name: String,
    pub amount: u64,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub note: String,
}

impl Transaction {
    /// Generate a transaction id with a kind prefix, e.g. `pay-<uuid>`
    pub fn generate_id(kind: TransactionKind) -> String {
        let prefix = match kind {
            TransactionKind::Payment => "pay",
            TransactionKind::Debt => "debt",
        };
        format!("{}-{}", prefix, Uuid::new_v4().simple())
    }

    /// Apply this transaction to a running balance
    pub fn apply_to(&self, balance: i64) -> i64 {
        apply_to_balance(balance, self.amount, self.kind)
    }
}

/// Payments subtract, debts add, and the result never drops below zero.
pub fn apply_to_balance(balance: i64, amount: u64, kind: TransactionKind) -> i64 {
    let amount = i64::try_from(amount).unwrap_or(i64::MAX);
    let next = match kind {
        TransactionKind::Payment => balance.saturating_sub(amount),
        TransactionKind::Debt => balance.saturating_add(amount),
    };
    next.max(0)
}

/// Replay a log in chronological order starting from a zero balance.
pub fn replay_balance<'a, I>(chronological: I) -> i64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    chronological
        .into_iter()
        .fold(0, |balance, transaction| transaction.apply_to(balance))
}
