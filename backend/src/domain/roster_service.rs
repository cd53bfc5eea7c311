use tracing::{info, warn};

use crate::domain::commands::roster::{
    CreateGroupCommand, CreateStudentCommand, ResetOutcome, UpdateGroupCommand,
    UpdateStudentCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    group::{Group, GroupStatus},
    student::{Student, StudentStatus},
};
use crate::domain::today_or;
use crate::storage::seed::seed_store;
use crate::storage::{Collection, RecordStore, StoreHandle};

/// Service for managing students and groups on the roster
#[derive(Clone)]
pub struct RosterService {
    store: StoreHandle,
}

impl RosterService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Enroll a new student with a zero balance and no attendance yet
    pub fn create_student(&self, command: CreateStudentCommand) -> DomainResult<Student> {
        info!("Creating student: name={}", command.name);
        let name = validate_name(&command.name, "Student")?;

        self.store.write(&[Collection::Students], |store| {
            require_groups(store, &command.group_ids)?;

            let student = Student {
                id: next_id(store.students().iter().map(|s| s.id.as_str()), store.students().len(), Student::generate_id),
                name,
                phone: command.phone.trim().to_string(),
                parent_phone: command.parent_phone.trim().to_string(),
                group_ids: command.group_ids,
                attendance_rate: None,
                balance: 0,
                status: StudentStatus::Active,
                notes: command.notes,
                contacts: command.contacts,
                custom_fields: command.custom_fields,
                join_date: today_or(command.join_date),
            };

            info!("Created student: {} with ID: {}", student.name, student.id);
            store.insert_student(student.clone());
            Ok(student)
        })
    }

    /// Edit profile fields. Balance, rate and the debtor/active classification
    /// are never taken from the caller.
    pub fn update_student(&self, command: UpdateStudentCommand) -> DomainResult<Student> {
        info!("Updating student: {}", command.student_id);
        let name = command
            .name
            .as_deref()
            .map(|name| validate_name(name, "Student"))
            .transpose()?;

        self.store.write(&[Collection::Students], |store| {
            if let Some(group_ids) = &command.group_ids {
                require_groups(store, group_ids)?;
            }
            let student = store.require_student_mut(&command.student_id)?;

            if let Some(name) = name {
                student.name = name;
            }
            if let Some(phone) = command.phone {
                student.phone = phone.trim().to_string();
            }
            if let Some(parent_phone) = command.parent_phone {
                student.parent_phone = parent_phone.trim().to_string();
            }
            if let Some(group_ids) = command.group_ids {
                student.group_ids = group_ids;
            }
            if let Some(notes) = command.notes {
                student.notes = notes;
            }
            if let Some(contacts) = command.contacts {
                student.contacts = contacts;
            }
            if let Some(custom_fields) = command.custom_fields {
                student.custom_fields = custom_fields;
            }
            match command.suspended {
                Some(true) => student.status = StudentStatus::Suspended,
                Some(false) => student.status = StudentStatus::from_balance(student.balance),
                None => {}
            }

            info!("Updated student: {} ({:?})", student.id, student.status);
            Ok(student.clone())
        })
    }

    /// Remove a student from the roster. Their log entries are kept.
    pub fn delete_student(&self, student_id: &str) -> DomainResult<Student> {
        info!("Deleting student: {}", student_id);
        self.store.write(&[Collection::Students], |store| {
            let student = store
                .remove_student(student_id)
                .ok_or_else(|| DomainError::UnknownStudent(student_id.to_string()))?;

            let orphans = store.records_for_student(student_id).count()
                + store.transactions_for_student(student_id).count();
            if orphans > 0 {
                warn!("Student {} leaves {} log entries behind", student_id, orphans);
            }
            Ok(student)
        })
    }

    pub fn create_group(&self, command: CreateGroupCommand) -> DomainResult<Group> {
        info!("Creating group: name={}", command.name);
        let name = validate_name(&command.name, "Group")?;
        validate_capacity(command.capacity)?;

        self.store.write(&[Collection::Groups], |store| {
            let group = Group {
                id: next_id(store.groups().iter().map(|g| g.id.as_str()), store.groups().len(), Group::generate_id),
                name,
                subject: command.subject.trim().to_string(),
                grade: command.grade.trim().to_string(),
                delivery: command.delivery,
                pricing: command.pricing,
                price: command.price,
                capacity: command.capacity,
                current_count: 0,
                status: GroupStatus::Open,
                schedule: command.schedule,
            };

            info!("Created group: {} with ID: {}", group.name, group.id);
            store.insert_group(group.clone());
            Ok(group)
        })
    }

    pub fn update_group(&self, command: UpdateGroupCommand) -> DomainResult<Group> {
        info!("Updating group: {}", command.group_id);
        let name = command
            .name
            .as_deref()
            .map(|name| validate_name(name, "Group"))
            .transpose()?;
        if let Some(capacity) = command.capacity {
            validate_capacity(capacity)?;
        }

        self.store.write(&[Collection::Groups], |store| {
            let group = store
                .group_mut(&command.group_id)
                .ok_or_else(|| DomainError::UnknownGroup(command.group_id.clone()))?;

            if let Some(name) = name {
                group.name = name;
            }
            if let Some(subject) = command.subject {
                group.subject = subject.trim().to_string();
            }
            if let Some(grade) = command.grade {
                group.grade = grade.trim().to_string();
            }
            if let Some(delivery) = command.delivery {
                group.delivery = delivery;
            }
            if let Some(pricing) = command.pricing {
                group.pricing = pricing;
            }
            if let Some(price) = command.price {
                group.price = price;
            }
            if let Some(capacity) = command.capacity {
                group.capacity = capacity;
            }
            if let Some(status) = command.status {
                group.status = status;
            }
            if let Some(schedule) = command.schedule {
                group.schedule = schedule;
            }

            info!("Updated group: {}", group.id);
            Ok(group.clone())
        })
    }

    /// Remove a group and unenroll everyone from it
    pub fn delete_group(&self, group_id: &str) -> DomainResult<Group> {
        info!("Deleting group: {}", group_id);
        self.store
            .write(&[Collection::Groups, Collection::Students], |store| {
                store
                    .remove_group(group_id)
                    .ok_or_else(|| DomainError::UnknownGroup(group_id.to_string()))
            })
    }

    /// Start a new center: drop every student, group and log entry, then
    /// restore the seed dataset when `reseed` is set. Every collection is
    /// handed to the persistence hook.
    pub fn reset_center(&self, reseed: bool) -> DomainResult<ResetOutcome> {
        warn!("Resetting center data (reseed={})", reseed);
        let replacement = if reseed { seed_store() } else { RecordStore::default() };

        self.store.write(&Collection::ALL, |store| {
            let previous = store.reset(replacement);
            info!(
                "Discarded {} students, {} groups, {} attendance records, {} transactions",
                previous.students().len(),
                previous.groups().len(),
                previous.attendance().len(),
                previous.transactions().len()
            );
            Ok(ResetOutcome {
                student_count: store.students().len(),
                group_count: store.groups().len(),
            })
        })
    }
}

fn validate_name(name: &str, what: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation(format!("{} name cannot be empty", what)));
    }
    if name.chars().count() > 100 {
        return Err(DomainError::Validation(format!(
            "{} name cannot exceed 100 characters",
            what
        )));
    }
    Ok(name.to_string())
}

fn validate_capacity(capacity: u32) -> DomainResult<()> {
    if capacity == 0 {
        return Err(DomainError::Validation("Group capacity must be positive".to_string()));
    }
    Ok(())
}

fn require_groups(store: &RecordStore, group_ids: &[String]) -> DomainResult<()> {
    for group_id in group_ids {
        store.require_group(group_id)?;
    }
    Ok(())
}

/// First `generate(n)` id, counting up from `len + 1`, that is not taken yet
fn next_id<'a>(
    existing: impl Iterator<Item = &'a str> + Clone,
    len: usize,
    generate: fn(usize) -> String,
) -> String {
    (len + 1..)
        .map(generate)
        .find(|candidate| !existing.clone().any(|id| id == candidate.as_str()))
        .unwrap_or_else(|| generate(len + 1))
}
