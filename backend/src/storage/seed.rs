//! Seed dataset used on first run, when no snapshot exists yet.

use chrono::NaiveDate;

use crate::domain::models::{
    group::{Delivery, Group, GroupStatus, Pricing, ScheduleSlot},
    student::{Contact, CustomField, Student, StudentStatus},
    transaction::{Transaction, TransactionKind},
};
use crate::storage::record_store::RecordStore;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn seed_groups() -> Vec<Group> {
    vec![
        Group {
            id: "g1".to_string(),
            name: "Physics - Grade 12 (A)".to_string(),
            subject: "Physics".to_string(),
            grade: "Grade 12".to_string(),
            delivery: Delivery::Hybrid,
            pricing: Pricing::Monthly,
            price: 400,
            capacity: 50,
            current_count: 42,
            status: GroupStatus::Open,
            schedule: vec![ScheduleSlot {
                day: "Sunday".to_string(),
                time: "16:00".to_string(),
                room: Some("Hall 1".to_string()),
            }],
        },
        Group {
            id: "g2".to_string(),
            name: "Physics - Grade 11 (B)".to_string(),
            subject: "Physics".to_string(),
            grade: "Grade 11".to_string(),
            delivery: Delivery::InPerson,
            pricing: Pricing::PerSession,
            price: 60,
            capacity: 30,
            current_count: 30,
            status: GroupStatus::Full,
            schedule: vec![ScheduleSlot {
                day: "Tuesday".to_string(),
                time: "18:00".to_string(),
                room: Some("Hall 3".to_string()),
            }],
        },
    ]
}

pub fn seed_students() -> Vec<Student> {
    vec![
        Student {
            id: "s1".to_string(),
            name: "Ahmed Mahmoud Soliman".to_string(),
            phone: "01012345678".to_string(),
            parent_phone: "01099887766".to_string(),
            group_ids: vec!["g1".to_string()],
            attendance_rate: None,
            balance: 0,
            status: StudentStatus::Active,
            notes: "Very committed, pays attention to detail.".to_string(),
            contacts: vec![Contact {
                relation: "Father".to_string(),
                name: "Mahmoud Soliman".to_string(),
                phone: "01099887766".to_string(),
            }],
            custom_fields: vec![
                CustomField {
                    label: "School".to_string(),
                    value: "Excellence School".to_string(),
                },
                CustomField {
                    label: "Area".to_string(),
                    value: "Maadi".to_string(),
                },
            ],
            join_date: date(2023, 9, 1),
        },
        Student {
            id: "s2".to_string(),
            name: "Sara Mohamed Hassan".to_string(),
            phone: "01198765432".to_string(),
            parent_phone: "01122334455".to_string(),
            group_ids: vec!["g2".to_string()],
            attendance_rate: None,
            balance: 150,
            status: StudentStatus::Debtor,
            notes: "Monthly subscription needs follow-up.".to_string(),
            contacts: vec![Contact {
                relation: "Mother".to_string(),
                name: "Fatma Elzahraa".to_string(),
                phone: "01122334455".to_string(),
            }],
            custom_fields: vec![CustomField {
                label: "School".to_string(),
                value: "Cairo Official".to_string(),
            }],
            join_date: date(2023, 10, 15),
        },
        Student {
            id: "s3".to_string(),
            name: "Yassin Ali Karim".to_string(),
            phone: "01234567890".to_string(),
            parent_phone: "01200011122".to_string(),
            group_ids: vec!["g1".to_string()],
            attendance_rate: None,
            balance: 0,
            status: StudentStatus::Active,
            notes: String::new(),
            contacts: vec![Contact {
                relation: "Uncle".to_string(),
                name: "Ibrahim Ali".to_string(),
                phone: "01200011122".to_string(),
            }],
            custom_fields: vec![CustomField {
                label: "Area".to_string(),
                value: "Nasr City".to_string(),
            }],
            join_date: date(2023, 8, 20),
        },
    ]
}

/// The debt backing the seeded s2 balance, so the cache matches the log
pub fn seed_transactions() -> Vec<Transaction> {
    vec![Transaction {
        id: "debt-seed-s2".to_string(),
        student_id: "s2".to_string(),
        student_name: "Sara Mohamed Hassan".to_string(),
        amount: 150,
        kind: TransactionKind::Debt,
        date: date(2023, 10, 15),
        note: "Monthly subscription".to_string(),
    }]
}

pub fn seed_store() -> RecordStore {
    RecordStore::from_parts(seed_students(), seed_groups(), Vec::new(), seed_transactions())
}
