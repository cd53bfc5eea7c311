//! Ledger service for the education center.
//!
//! Appends payments and debts to the transaction log and keeps each student's
//! balance and status caches consistent with it. Balances are clamped at zero:
//! an overpayment is absorbed and never carried as credit.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::commands::ledger::{
    FinancialSummary, RecordTransactionCommand, RecordTransactionResult, TransactionListQuery,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    student::StudentStatus,
    transaction::{Transaction, TransactionKind},
};
use crate::domain::today_or;
use crate::storage::{Collection, RecordStore, StoreHandle};

/// Service that owns balance and status derivation
#[derive(Clone)]
pub struct LedgerService {
    store: StoreHandle,
    high_debt_threshold: i64,
}

impl LedgerService {
    pub fn new(store: StoreHandle, high_debt_threshold: i64) -> Self {
        Self {
            store,
            high_debt_threshold,
        }
    }

    /// Record a payment or a debt for a student.
    ///
    /// The amount must be strictly positive. On success the transaction is
    /// prepended to the log, the balance is moved and clamped at zero, and the
    /// status is reclassified as `debtor` or `active`.
    pub fn record_transaction(&self, command: RecordTransactionCommand) -> DomainResult<RecordTransactionResult> {
        info!(
            "Recording {:?} of {} for student {}",
            command.kind, command.amount, command.student_id
        );

        let amount = match u64::try_from(command.amount) {
            Ok(amount) if amount > 0 => amount,
            _ => {
                warn!("Rejected transaction with amount {}", command.amount);
                return Err(DomainError::InvalidAmount(command.amount));
            }
        };
        let date = today_or(command.date);

        self.store
            .write(&[Collection::Transactions, Collection::Students], |store| {
                let student = store.require_student_mut(&command.student_id)?;

                let transaction = Transaction {
                    id: Transaction::generate_id(command.kind),
                    student_id: student.id.clone(),
                    student_name: student.name.clone(),
                    amount,
                    kind: command.kind,
                    date,
                    note: command.note.trim().to_string(),
                };

                let previous = student.balance;
                student.balance = transaction.apply_to(previous);
                student.status = StudentStatus::from_balance(student.balance);
                let (new_balance, status) = (student.balance, student.status);

                info!(
                    "Student {} balance {} -> {} ({:?})",
                    student.id, previous, new_balance, status
                );

                store.insert_transaction(transaction.clone());

                Ok(RecordTransactionResult {
                    transaction,
                    new_balance,
                    status,
                })
            })
            .map_err(|e| {
                warn!("Transaction not recorded for {}: {}", command.student_id, e);
                e
            })
    }

    /// Transactions matching the query, most recent first
    pub fn list_transactions(&self, query: TransactionListQuery) -> Vec<Transaction> {
        debug!("Listing transactions: {:?}", query);
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.store.read(|store| {
            store
                .transactions()
                .iter()
                .filter(|t| query.student_id.as_deref().map_or(true, |id| t.student_id == id))
                .filter(|t| {
                    needle.as_deref().map_or(true, |needle| {
                        t.student_name.to_lowercase().contains(needle)
                            || t.note.to_lowercase().contains(needle)
                    })
                })
                .cloned()
                .collect()
        })
    }

    /// Income totals and outstanding debt, with `day` defaulting to today
    pub fn financial_summary(&self, day: Option<NaiveDate>) -> FinancialSummary {
        let day = today_or(day);
        self.store.read(|store| {
            let payments = store
                .transactions()
                .iter()
                .filter(|t| t.kind == TransactionKind::Payment);

            // Totals saturate; a single balance may already sit at i64::MAX
            let (total_income, income_on_day) = payments.fold((0u64, 0u64), |(total, on_day), t| {
                let on_day = if t.date == day { on_day.saturating_add(t.amount) } else { on_day };
                (total.saturating_add(t.amount), on_day)
            });

            let outstanding_debt = total_outstanding_debt(store);
            let high_debt_students = store
                .students()
                .iter()
                .filter(|s| s.balance > self.high_debt_threshold)
                .count();

            FinancialSummary {
                total_income,
                income_on_day,
                outstanding_debt,
                high_debt_students,
            }
        })
    }
}

/// Sum of every positive balance, saturating at `i64::MAX`
pub fn total_outstanding_debt(store: &RecordStore) -> i64 {
    store
        .students()
        .iter()
        .map(|s| s.balance.max(0))
        .fold(0, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::seed_store;

    fn setup_test() -> (LedgerService, StoreHandle) {
        let store = StoreHandle::in_memory(seed_store());
        (LedgerService::new(store.clone(), 250), store)
    }

    fn command(student_id: &str, amount: i64, kind: TransactionKind) -> RecordTransactionCommand {
        RecordTransactionCommand {
            student_id: student_id.to_string(),
            amount,
            kind,
            note: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10),
        }
    }

    #[test]
    fn test_debt_then_payments_scenario() {
        let (service, store) = setup_test();

        let debt = service.record_transaction(command("s1", 150, TransactionKind::Debt)).unwrap();
        assert_eq!(debt.new_balance, 150);
        assert_eq!(debt.status, StudentStatus::Debtor);

        let paid = service.record_transaction(command("s1", 150, TransactionKind::Payment)).unwrap();
        assert_eq!(paid.new_balance, 0);
        assert_eq!(paid.status, StudentStatus::Active);

        let overpaid = service.record_transaction(command("s1", 50, TransactionKind::Payment)).unwrap();
        assert_eq!(overpaid.new_balance, 0);
        assert_eq!(overpaid.status, StudentStatus::Active);

        let student = store.read(|s| s.student("s1").cloned()).unwrap();
        assert_eq!(student.balance, 0);
        assert_eq!(store.read(|s| s.transactions_for_student("s1").count()), 3);
    }

    #[test]
    fn test_payment_larger_than_balance_leaves_zero() {
        let (service, _store) = setup_test();
        // s2 starts with 150 outstanding
        let result = service.record_transaction(command("s2", 400, TransactionKind::Payment)).unwrap();
        assert_eq!(result.new_balance, 0);
        assert_eq!(result.transaction.amount, 400);
    }

    #[test]
    fn test_balance_never_negative_over_mixed_sequence() {
        let (service, store) = setup_test();
        let steps = [
            (30, TransactionKind::Payment),
            (70, TransactionKind::Debt),
            (100, TransactionKind::Payment),
            (20, TransactionKind::Debt),
            (5, TransactionKind::Payment),
            (500, TransactionKind::Payment),
        ];
        for (amount, kind) in steps {
            let result = service.record_transaction(command("s3", amount, kind)).unwrap();
            assert!(result.new_balance >= 0);
        }
        assert_eq!(store.read(|s| s.student("s3").unwrap().balance), 0);
    }

    #[test]
    fn test_invalid_amounts_are_rejected_before_mutation() {
        let (service, store) = setup_test();
        for amount in [0, -10] {
            let result = service.record_transaction(command("s1", amount, TransactionKind::Debt));
            assert_eq!(result.unwrap_err(), DomainError::InvalidAmount(amount));
        }
        assert_eq!(store.read(|s| s.transactions().len()), 1);
    }

    #[test]
    fn test_unknown_student_is_reported() {
        let (service, store) = setup_test();
        let result = service.record_transaction(command("ghost", 10, TransactionKind::Debt));
        assert_eq!(result.unwrap_err(), DomainError::UnknownStudent("ghost".to_string()));
        assert_eq!(store.read(|s| s.transactions().len()), 1);
    }

    #[test]
    fn test_ledger_clears_suspension() {
        let (service, store) = setup_test();
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s1")?.status = StudentStatus::Suspended;
                Ok::<_, DomainError>(())
            })
            .unwrap();

        let result = service.record_transaction(command("s1", 10, TransactionKind::Debt)).unwrap();
        assert_eq!(result.status, StudentStatus::Debtor);
    }

    #[test]
    fn test_name_snapshot_is_not_resynced() {
        let (service, store) = setup_test();
        service.record_transaction(command("s1", 10, TransactionKind::Debt)).unwrap();
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s1")?.name = "Renamed".to_string();
                Ok::<_, DomainError>(())
            })
            .unwrap();

        let transactions = service.list_transactions(TransactionListQuery {
            student_id: Some("s1".to_string()),
            ..Default::default()
        });
        assert_eq!(transactions[0].student_name, "Ahmed Mahmoud Soliman");
    }

    #[test]
    fn test_list_transactions_search() {
        let (service, _store) = setup_test();
        let mut cmd = command("s1", 400, TransactionKind::Payment);
        cmd.note = "October Fees".to_string();
        service.record_transaction(cmd).unwrap();

        let by_note = service.list_transactions(TransactionListQuery {
            search: Some("october".to_string()),
            ..Default::default()
        });
        assert_eq!(by_note.len(), 1);

        let by_name = service.list_transactions(TransactionListQuery {
            search: Some("sara".to_string()),
            ..Default::default()
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].student_id, "s2");

        let everything = service.list_transactions(TransactionListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_financial_summary() {
        let (service, _store) = setup_test();
        service.record_transaction(command("s2", 100, TransactionKind::Payment)).unwrap();
        service.record_transaction(command("s3", 300, TransactionKind::Debt)).unwrap();

        let summary = service.financial_summary(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(summary.total_income, 100);
        assert_eq!(summary.income_on_day, 100);
        assert_eq!(summary.outstanding_debt, 350);
        assert_eq!(summary.high_debt_students, 1);

        let other_day = service.financial_summary(NaiveDate::from_ymd_opt(2024, 1, 11));
        assert_eq!(other_day.income_on_day, 0);
    }

    #[test]
    fn test_summary_saturates_on_huge_balances() {
        let (service, _store) = setup_test();
        for student_id in ["s1", "s3"] {
            let result = service
                .record_transaction(command(student_id, i64::MAX, TransactionKind::Debt))
                .unwrap();
            assert_eq!(result.new_balance, i64::MAX);
        }
        for student_id in ["s1", "s3"] {
            service
                .record_transaction(command(student_id, i64::MAX, TransactionKind::Payment))
                .unwrap();
        }
        service.record_transaction(command("s2", i64::MAX, TransactionKind::Payment)).unwrap();
        service.record_transaction(command("s1", i64::MAX, TransactionKind::Debt)).unwrap();
        service.record_transaction(command("s3", i64::MAX, TransactionKind::Debt)).unwrap();

        let summary = service.financial_summary(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(summary.outstanding_debt, i64::MAX);
        assert_eq!(summary.total_income, u64::MAX);
        assert_eq!(summary.income_on_day, u64::MAX);
    }
}
