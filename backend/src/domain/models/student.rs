//! Domain model for a student on the roster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Suspended,
    Debtor,
}

impl StudentStatus {
    /// Classification applied by the ledger after every balance change.
    /// Never yields `Suspended`; that state belongs to roster management.
    pub fn from_balance(balance: i64) -> Self {
        if balance > 0 {
            StudentStatus::Debtor
        } else {
            StudentStatus::Active
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub relation: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub parent_phone: String,
    pub group_ids: Vec<String>,
    /// Cache of the attendance log; `None` until the first record exists
    pub attendance_rate: Option<u8>,
    /// Cache of the transaction log, clamped at zero
    pub balance: i64,
    pub status: StudentStatus,
    pub notes: String,
    pub contacts: Vec<Contact>,
    pub custom_fields: Vec<CustomField>,
    pub join_date: NaiveDate,
}

impl Student {
    pub fn is_enrolled_in(&self, group_id: &str) -> bool {
        self.group_ids.iter().any(|id| id == group_id)
    }

    /// The group used by scan-a-code admission
    pub fn primary_group(&self) -> Option<&str> {
        self.group_ids.first().map(String::as_str)
    }

    /// Generate a roster id such as `s4` from the next free sequence number
    pub fn generate_id(sequence: usize) -> String {
        format!("s{}", sequence)
    }
}
