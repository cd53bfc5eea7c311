//! Domain model for a class group. Read-only to the attendance and ledger services.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delivery {
    InPerson,
    Online,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pricing {
    Monthly,
    PerSession,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Open,
    Full,
    Paused,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub day: String,
    pub time: String,
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub grade: String,
    pub delivery: Delivery,
    pub pricing: Pricing,
    pub price: u64,
    pub capacity: u32,
    pub current_count: u32,
    pub status: GroupStatus,
    pub schedule: Vec<ScheduleSlot>,
}

impl Group {
    pub fn meets_on(&self, day_label: &str) -> bool {
        self.schedule.iter().any(|slot| slot.day == day_label)
    }

    pub fn generate_id(sequence: usize) -> String {
        format!("g{}", sequence)
    }
}
