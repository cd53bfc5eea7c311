//! Domain model for an attendance record.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Late arrivals count as attended
    pub fn counts_as_attended(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub group_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn generate_id() -> String {
        format!("att-{}", Uuid::new_v4().simple())
    }

    /// True when this record occupies the (student, group, day) slot
    pub fn occupies(&self, student_id: &str, group_id: &str, date: NaiveDate) -> bool {
        self.student_id == student_id && self.group_id == group_id && self.date == date
    }
}

/// `round(100 * attended / total)` over the given records, or `None` when empty.
pub fn attendance_rate<'a, I>(records: I) -> Option<u8>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let (attended, total) = records.into_iter().fold((0u64, 0u64), |(attended, total), record| {
        let attended = attended + u64::from(record.status.counts_as_attended());
        (attended, total + 1)
    });

    if total == 0 {
        return None;
    }

    // Integer half-up rounding; matches Math.round for non-negative ratios.
    let rate = (200 * attended + total) / (2 * total);
    Some(rate as u8)
}
