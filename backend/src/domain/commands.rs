//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod attendance {
    use crate::domain::models::attendance::{AttendanceRecord, AttendanceStatus};
    use chrono::NaiveDate;

    /// Input for marking a student in a group.
    #[derive(Debug, Clone)]
    pub struct MarkAttendanceCommand {
        pub student_id: String,
        pub group_id: String,
        pub status: AttendanceStatus,
        /// Defaults to the local calendar day
        pub date: Option<NaiveDate>,
    }

    /// Input for scan-a-code admission.
    #[derive(Debug, Clone)]
    pub struct QuickAdmitCommand {
        pub code: String,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone)]
    pub struct MarkAttendanceResult {
        pub record: AttendanceRecord,
        pub attendance_rate: u8,
        pub student_name: String,
    }

    #[derive(Debug, Clone, Default)]
    pub struct AttendanceListQuery {
        pub student_id: Option<String>,
        pub group_id: Option<String>,
        pub date: Option<NaiveDate>,
    }

    /// Head counts for one group on one day.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DailySummary {
        pub group_id: String,
        pub date: NaiveDate,
        pub attended: usize,
        pub absent: usize,
        pub not_marked: usize,
    }
}

pub mod ledger {
    use crate::domain::models::{
        student::StudentStatus,
        transaction::{Transaction, TransactionKind},
    };
    use chrono::NaiveDate;

    /// Input for recording a payment or a debt.
    #[derive(Debug, Clone)]
    pub struct RecordTransactionCommand {
        pub student_id: String,
        /// Validated to be strictly positive before any mutation
        pub amount: i64,
        pub kind: TransactionKind,
        pub note: String,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone)]
    pub struct RecordTransactionResult {
        pub transaction: Transaction,
        pub new_balance: i64,
        pub status: StudentStatus,
    }

    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub search: Option<String>,
        pub student_id: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct FinancialSummary {
        pub total_income: u64,
        pub income_on_day: u64,
        pub outstanding_debt: i64,
        pub high_debt_students: usize,
    }
}

pub mod roster {
    use crate::domain::models::{
        group::{Delivery, GroupStatus, Pricing, ScheduleSlot},
        student::{Contact, CustomField, StudentStatus},
    };
    use chrono::NaiveDate;

    #[derive(Debug, Clone)]
    pub struct CreateStudentCommand {
        pub name: String,
        pub phone: String,
        pub parent_phone: String,
        pub group_ids: Vec<String>,
        pub notes: String,
        pub contacts: Vec<Contact>,
        pub custom_fields: Vec<CustomField>,
        pub join_date: Option<NaiveDate>,
    }

    /// Profile edits; derived fields are deliberately absent.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateStudentCommand {
        pub student_id: String,
        pub name: Option<String>,
        pub phone: Option<String>,
        pub parent_phone: Option<String>,
        pub group_ids: Option<Vec<String>>,
        pub notes: Option<String>,
        pub contacts: Option<Vec<Contact>>,
        pub custom_fields: Option<Vec<CustomField>>,
        pub suspended: Option<bool>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateGroupCommand {
        pub name: String,
        pub subject: String,
        pub grade: String,
        pub delivery: Delivery,
        pub pricing: Pricing,
        pub price: u64,
        pub capacity: u32,
        pub schedule: Vec<ScheduleSlot>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateGroupCommand {
        pub group_id: String,
        pub name: Option<String>,
        pub subject: Option<String>,
        pub grade: Option<String>,
        pub delivery: Option<Delivery>,
        pub pricing: Option<Pricing>,
        pub price: Option<u64>,
        pub capacity: Option<u32>,
        pub status: Option<GroupStatus>,
        pub schedule: Option<Vec<ScheduleSlot>>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct StudentFilter {
        /// Substring of the name or phone number
        pub search: Option<String>,
        pub status: Option<StudentStatus>,
        pub group_id: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Occupancy {
        pub group_id: String,
        pub group_name: String,
        pub enrolled: usize,
        pub capacity: u32,
        pub is_full: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct DashboardSummary {
        pub date: NaiveDate,
        pub student_count: usize,
        pub group_count: usize,
        pub average_attendance_rate: u8,
        pub outstanding_debt: i64,
        pub income_on_day: u64,
        pub sessions_today: Vec<String>,
        pub alerts: Vec<DashboardAlert>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DashboardAlert {
        /// Students whose balance is above the high-debt threshold
        HighDebt { students: usize },
        LowAttendance { average: u8, threshold: u8 },
        SessionsToday { count: usize },
    }

    /// Limits that turn dashboard figures into alerts
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AlertThresholds {
        pub high_debt: i64,
        pub low_attendance: u8,
    }

    impl Default for AlertThresholds {
        fn default() -> Self {
            Self {
                high_debt: 250,
                low_attendance: 75,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ResetOutcome {
        pub student_count: usize,
        pub group_count: usize,
    }
}

pub mod reconciliation {
    use crate::domain::models::student::Student;

    #[derive(Debug, Clone)]
    pub struct RecomputeResult {
        pub student: Student,
        pub changed: bool,
    }

    /// One cached field that disagrees with the logs.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CacheDrift {
        pub student_id: String,
        pub field: &'static str,
        pub cached: String,
        pub expected: String,
    }

    #[derive(Debug, Clone, Default)]
    pub struct AuditReport {
        pub drifts: Vec<CacheDrift>,
        pub orphaned_records: usize,
        pub orphaned_transactions: usize,
    }
}
