//! # Record Store
//!
//! In-memory collections of students, groups, attendance records and
//! transactions, plus the `StoreHandle` through which services share them.
//!
//! The attendance and transaction logs are kept most-recent-first. Entries in
//! either log are never edited or removed once inserted; only a full reset
//! clears them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    attendance::AttendanceRecord, group::Group, student::Student, transaction::Transaction,
};
use crate::storage::traits::{NoopPersistence, PersistenceHook};

/// The collections a mutation can touch. Each one persists under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Groups,
    Attendance,
    Transactions,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Groups,
        Collection::Attendance,
        Collection::Transactions,
    ];

    /// Fixed storage key of the collection
    pub fn storage_key(self) -> &'static str {
        match self {
            Collection::Students => "ecp_students",
            Collection::Groups => "ecp_groups",
            Collection::Attendance => "ecp_attendance",
            Collection::Transactions => "ecp_transactions",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    students: Vec<Student>,
    groups: Vec<Group>,
    attendance: Vec<AttendanceRecord>,
    transactions: Vec<Transaction>,
}

impl RecordStore {
    pub fn from_parts(
        students: Vec<Student>,
        groups: Vec<Group>,
        attendance: Vec<AttendanceRecord>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            students,
            groups,
            attendance,
            transactions,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Attendance log, most recent first
    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    /// Transaction log, most recent first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn student_mut(&mut self, student_id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == student_id)
    }

    /// Like `student`, but a missing id is an error
    pub fn require_student(&self, student_id: &str) -> DomainResult<&Student> {
        self.student(student_id)
            .ok_or_else(|| DomainError::UnknownStudent(student_id.to_string()))
    }

    pub fn require_student_mut(&mut self, student_id: &str) -> DomainResult<&mut Student> {
        self.student_mut(student_id)
            .ok_or_else(|| DomainError::UnknownStudent(student_id.to_string()))
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    pub fn require_group(&self, group_id: &str) -> DomainResult<&Group> {
        self.group(group_id)
            .ok_or_else(|| DomainError::UnknownGroup(group_id.to_string()))
    }

    pub fn records_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a AttendanceRecord> + 'a {
        self.attendance.iter().filter(move |r| r.student_id == student_id)
    }

    pub fn transactions_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |t| t.student_id == student_id)
    }

    pub fn has_record(&self, student_id: &str, group_id: &str, date: NaiveDate) -> bool {
        self.attendance
            .iter()
            .any(|r| r.occupies(student_id, group_id, date))
    }

    /// Insert a record at the front of the log, refusing a second record for
    /// the same (student, group, day).
    pub fn insert_record(&mut self, record: AttendanceRecord) -> DomainResult<()> {
        if self.has_record(&record.student_id, &record.group_id, record.date) {
            return Err(DomainError::AlreadyMarked {
                student_id: record.student_id,
                group_id: record.group_id,
                date: record.date,
            });
        }
        debug!("Inserting attendance record {}", record.id);
        self.attendance.insert(0, record);
        Ok(())
    }

    /// Insert a transaction at the front of the log
    pub fn insert_transaction(&mut self, transaction: Transaction) {
        debug!("Inserting transaction {}", transaction.id);
        self.transactions.insert(0, transaction);
    }

    pub fn insert_student(&mut self, student: Student) {
        self.students.insert(0, student);
    }

    pub fn remove_student(&mut self, student_id: &str) -> Option<Student> {
        let index = self.students.iter().position(|s| s.id == student_id)?;
        Some(self.students.remove(index))
    }

    pub fn insert_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Remove a group and drop it from every student's enrollment list
    pub fn remove_group(&mut self, group_id: &str) -> Option<Group> {
        let index = self.groups.iter().position(|g| g.id == group_id)?;
        for student in &mut self.students {
            student.group_ids.retain(|id| id != group_id);
        }
        Some(self.groups.remove(index))
    }

    /// Replace every collection at once, returning the previous contents
    pub fn reset(&mut self, replacement: RecordStore) -> RecordStore {
        debug!("Resetting record store");
        std::mem::replace(self, replacement)
    }

    /// Records whose student is no longer on the roster
    pub fn orphaned_records(&self) -> impl Iterator<Item = &AttendanceRecord> {
        self.attendance
            .iter()
            .filter(|r| self.student(&r.student_id).is_none())
    }

    /// Transactions whose student is no longer on the roster
    pub fn orphaned_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| self.student(&t.student_id).is_none())
    }
}

/// Shared, explicitly owned handle to the record store.
///
/// Every mutation runs inside one critical section, so read-then-write
/// sequences (duplicate check then append, balance read then update) cannot
/// interleave. The persistence hook runs after each successful mutation,
/// outside the store lock, on a snapshot taken once the hook is free.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<Mutex<RecordStore>>,
    hook: Arc<dyn PersistenceHook>,
    persisting: Arc<Mutex<()>>,
}

impl StoreHandle {
    pub fn new(store: RecordStore, hook: Arc<dyn PersistenceHook>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            hook,
            persisting: Arc::new(Mutex::new(())),
        }
    }

    /// A store that is never persisted
    pub fn in_memory(store: RecordStore) -> Self {
        Self::new(store, Arc::new(NoopPersistence))
    }

    fn lock(&self) -> MutexGuard<'_, RecordStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Run a mutation and notify the persistence hook about `changed`.
    /// The closure must validate before it mutates: an `Err` skips the hook
    /// and is returned as is.
    pub fn write<R, E>(
        &self,
        changed: &[Collection],
        f: impl FnOnce(&mut RecordStore) -> Result<R, E>,
    ) -> Result<R, E> {
        let result = {
            let mut guard = self.lock();
            f(&mut *guard)?
        };

        // Hook calls are serialized and each one sees state at least as new as
        // its own mutation, so the last write of a collection always wins
        let _persisting = self.persisting.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();
        if let Err(e) = self.hook.persist(&snapshot, changed) {
            warn!("Persistence hook failed for {:?}: {:#}", changed, e);
        }
        Ok(result)
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> RecordStore {
        self.read(RecordStore::clone)
    }
}
