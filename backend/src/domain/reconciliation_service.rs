//! Reconciliation of cached student fields against the logs.
//!
//! `attendance_rate`, `balance` and the derived part of `status` are caches.
//! This service rebuilds them from the attendance and transaction logs, either
//! for one student on demand or as a read-only audit over the whole roster.

use tracing::{info, warn};

use crate::domain::commands::reconciliation::{AuditReport, CacheDrift, RecomputeResult};
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    attendance::attendance_rate,
    student::{Student, StudentStatus},
    transaction::{replay_balance, Transaction},
};
use crate::storage::{Collection, RecordStore, StoreHandle};

/// Values a student's caches should hold according to the logs
#[derive(Debug, Clone, Copy, PartialEq)]
struct Expected {
    attendance_rate: Option<u8>,
    balance: i64,
    status: StudentStatus,
}

impl Expected {
    fn derive(store: &RecordStore, student: &Student) -> Self {
        let attendance_rate = attendance_rate(store.records_for_student(&student.id));

        // The log is most-recent-first; clamping makes replay order-sensitive
        let transactions: Vec<&Transaction> = store.transactions_for_student(&student.id).collect();
        let balance = replay_balance(transactions.into_iter().rev());

        let status = if student.status == StudentStatus::Suspended {
            StudentStatus::Suspended
        } else {
            StudentStatus::from_balance(balance)
        };

        Self {
            attendance_rate,
            balance,
            status,
        }
    }

    fn drifts(&self, student: &Student) -> Vec<CacheDrift> {
        let mut drifts = Vec::new();
        if student.attendance_rate != self.attendance_rate {
            drifts.push(drift(
                student,
                "attendance_rate",
                format!("{:?}", student.attendance_rate),
                format!("{:?}", self.attendance_rate),
            ));
        }
        if student.balance != self.balance {
            drifts.push(drift(
                student,
                "balance",
                student.balance.to_string(),
                self.balance.to_string(),
            ));
        }
        if student.status != self.status {
            drifts.push(drift(
                student,
                "status",
                format!("{:?}", student.status),
                format!("{:?}", self.status),
            ));
        }
        drifts
    }
}

fn drift(student: &Student, field: &'static str, cached: String, expected: String) -> CacheDrift {
    CacheDrift {
        student_id: student.id.clone(),
        field,
        cached,
        expected,
    }
}

#[derive(Clone)]
pub struct ReconciliationService {
    store: StoreHandle,
}

impl ReconciliationService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Rebuild one student's caches from the logs.
    ///
    /// A suspended student stays suspended; otherwise the status is
    /// reclassified from the replayed balance.
    pub fn recompute(&self, student_id: &str) -> DomainResult<RecomputeResult> {
        info!("Recomputing caches for student {}", student_id);

        self.store.write(&[Collection::Students], |store| {
            let expected = {
                let student = store.require_student(student_id)?;
                Expected::derive(store, student)
            };

            let student = store.require_student_mut(student_id)?;
            let changed = student.attendance_rate != expected.attendance_rate
                || student.balance != expected.balance
                || student.status != expected.status;

            if changed {
                warn!(
                    "Student {} caches drifted: rate {:?} -> {:?}, balance {} -> {}, status {:?} -> {:?}",
                    student.id,
                    student.attendance_rate,
                    expected.attendance_rate,
                    student.balance,
                    expected.balance,
                    student.status,
                    expected.status
                );
                student.attendance_rate = expected.attendance_rate;
                student.balance = expected.balance;
                student.status = expected.status;
            }

            Ok(RecomputeResult {
                student: student.clone(),
                changed,
            })
        })
    }

    /// Compare every student's caches with the logs without mutating anything
    pub fn audit(&self) -> AuditReport {
        info!("Auditing cached student fields");
        let report = self.store.read(|store| AuditReport {
            drifts: store
                .students()
                .iter()
                .flat_map(|student| Expected::derive(store, student).drifts(student))
                .collect(),
            orphaned_records: store.orphaned_records().count(),
            orphaned_transactions: store.orphaned_transactions().count(),
        });

        if report.drifts.is_empty() {
            info!("All cached fields match the logs");
        } else {
            warn!("Audit found {} drifted fields", report.drifts.len());
        }
        report
    }
}
