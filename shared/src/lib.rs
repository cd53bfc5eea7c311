use serde::{Deserialize, Serialize};

/// Attendance outcome for a single student in a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// Direction of a ledger entry. Amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received from the student (reduces the balance)
    Payment,
    /// Money owed by the student (increases the balance)
    Debt,
}

/// Standing of a student, derived from the balance except for `Suspended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Suspended,
    Debtor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupDelivery {
    InPerson,
    Online,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingType {
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
pub struct StudentContact {
    pub relation: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    pub value: String,
}

/// Represents a student on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub parent_phone: String,
    pub group_ids: Vec<String>,
    /// Percentage of attended sessions (present or late); None before the first record
    pub attendance_rate: Option<u8>,
    /// Outstanding amount owed by the student, never negative
    pub balance: i64,
    pub status: StudentStatus,
    pub notes: String,
    pub contacts: Vec<StudentContact>,
    pub custom_fields: Vec<CustomField>,
    pub join_date: String, // ISO 8601 date format (YYYY-MM-DD)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub day: String,
    pub time: String,
    pub room: Option<String>,
}

/// Represents a class group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub grade: String,
    pub delivery: GroupDelivery,
    pub pricing: PricingType,
    pub price: u64,
    pub capacity: u32,
    /// Display-only head count; see `GroupOccupancy` for the real value
    pub current_count: u32,
    pub status: GroupStatus,
    pub schedule: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub group_id: String,
    pub date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub student_id: String,
    /// Name of the student when the transaction was recorded
    pub student_name: String,
    pub amount: u64,
    pub kind: TransactionKind,
    pub date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub note: String,
}

/// Request for marking attendance of a student in a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub student_id: String,
    pub group_id: String,
    pub status: AttendanceStatus,
    /// Defaults to today when not provided (YYYY-MM-DD)
    pub date: Option<String>,
}

/// Request for scan-a-code admission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAdmitRequest {
    pub code: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAttendanceResponse {
    pub record: AttendanceRecord,
    pub attendance_rate: u8,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AttendanceListRequest {
    pub student_id: Option<String>,
    pub group_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummaryRequest {
    pub group_id: String,
    pub date: Option<String>,
}

/// Head counts for one group on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummaryResponse {
    pub group_id: String,
    pub date: String,
    pub attended: usize,
    pub absent: usize,
    pub not_marked: usize,
}

/// Request for recording a payment or a debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTransactionRequest {
    pub student_id: String,
    /// Must be strictly positive
    pub amount: i64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub note: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTransactionResponse {
    pub transaction: Transaction,
    pub new_balance: i64,
    pub status: StudentStatus,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionListRequest {
    /// Case-insensitive match against student name or note
    pub search: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: u64,
    pub income_on_day: u64,
    pub outstanding_debt: i64,
    pub high_debt_students: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudentSearchRequest {
    /// Substring of the name or phone number
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub parent_phone: String,
    #[serde(default)]
    pub group_ids: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub contacts: Vec<StudentContact>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub join_date: Option<String>,
}

/// Profile edits. Balance, attendance rate and the derived status are not editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub group_ids: Option<Vec<String>>,
    pub notes: Option<String>,
    pub contacts: Option<Vec<StudentContact>>,
    pub custom_fields: Option<Vec<CustomField>>,
    pub suspended: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub grade: String,
    pub delivery: GroupDelivery,
    pub pricing: PricingType,
    pub price: u64,
    pub capacity: u32,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub delivery: Option<GroupDelivery>,
    pub pricing: Option<PricingType>,
    pub price: Option<u64>,
    pub capacity: Option<u32>,
    pub status: Option<GroupStatus>,
    pub schedule: Option<Vec<ScheduleSlot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub group: Group,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success_message: String,
}

/// Real enrollment of a group compared to its capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOccupancy {
    pub group_id: String,
    pub group_name: String,
    pub enrolled: usize,
    pub capacity: u32,
    pub is_full: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyListResponse {
    pub groups: Vec<GroupOccupancy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub date: String,
    pub student_count: usize,
    pub group_count: usize,
    pub average_attendance_rate: u8,
    pub outstanding_debt: i64,
    pub income_on_day: u64,
    pub sessions_today: Vec<String>,
    pub alerts: Vec<DashboardAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Finance,
    Attendance,
    Schedule,
}

/// Urgent notice shown on the landing screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAlert {
    pub kind: AlertKind,
    pub count: u64,
    pub message: String,
}

/// Wipe every collection; the seed dataset is restored unless `empty` is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetCenterRequest {
    #[serde(default)]
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetCenterResponse {
    pub student_count: usize,
    pub group_count: usize,
    pub success_message: String,
}

/// Result of rebuilding a student's cached fields from the logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeResponse {
    pub student: Student,
    pub changed: bool,
}

/// A student whose cached fields disagree with the logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheDrift {
    pub student_id: String,
    pub field: String,
    pub cached: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResponse {
    pub drifts: Vec<CacheDrift>,
    pub orphaned_records: usize,
    pub orphaned_transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
}
