use chrono::NaiveDate;

/// Failures reported by the attendance, ledger and roster services.
/// None of them leave partial mutations behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Student {student_id} is already marked in group {group_id} on {date}")]
    AlreadyMarked {
        student_id: String,
        group_id: String,
        date: NaiveDate,
    },
    #[error("Student not found: {0}")]
    UnknownStudent(String),
    #[error("Group not found: {0}")]
    UnknownGroup(String),
    #[error("Student {student_id} is not enrolled in group {group_id}")]
    NotEnrolled { student_id: String, group_id: String },
    #[error("Student {0} is not enrolled in any group")]
    NoEnrolledGroup(String),
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(i64),
    #[error("{0}")]
    Validation(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
