use anyhow::Result;

use super::{format_date, parse_optional_date};
use crate::domain::commands::attendance::{
    AttendanceListQuery, DailySummary, MarkAttendanceCommand, MarkAttendanceResult, QuickAdmitCommand,
};
use crate::domain::models::attendance::{
    AttendanceRecord as DomainRecord, AttendanceStatus as DomainStatus,
};
use shared::{
    AttendanceListRequest, AttendanceListResponse, AttendanceRecord as SharedRecord,
    AttendanceStatus as SharedStatus, AttendanceSummaryResponse, MarkAttendanceRequest,
    MarkAttendanceResponse, QuickAdmitRequest,
};

pub struct AttendanceMapper;

impl AttendanceMapper {
    fn status_to_domain(dto: SharedStatus) -> DomainStatus {
        match dto {
            SharedStatus::Present => DomainStatus::Present,
            SharedStatus::Absent => DomainStatus::Absent,
            SharedStatus::Late => DomainStatus::Late,
        }
    }

    fn status_to_dto(domain: DomainStatus) -> SharedStatus {
        match domain {
            DomainStatus::Present => SharedStatus::Present,
            DomainStatus::Absent => SharedStatus::Absent,
            DomainStatus::Late => SharedStatus::Late,
        }
    }

    pub fn to_dto(domain: DomainRecord) -> SharedRecord {
        SharedRecord {
            id: domain.id,
            student_id: domain.student_id,
            group_id: domain.group_id,
            date: format_date(domain.date),
            status: Self::status_to_dto(domain.status),
        }
    }

    pub fn to_mark_command(request: MarkAttendanceRequest) -> Result<MarkAttendanceCommand> {
        Ok(MarkAttendanceCommand {
            date: parse_optional_date(request.date.as_deref())?,
            student_id: request.student_id,
            group_id: request.group_id,
            status: Self::status_to_domain(request.status),
        })
    }

    pub fn to_quick_admit_command(request: QuickAdmitRequest) -> Result<QuickAdmitCommand> {
        Ok(QuickAdmitCommand {
            date: parse_optional_date(request.date.as_deref())?,
            code: request.code,
        })
    }

    pub fn to_list_query(request: AttendanceListRequest) -> Result<AttendanceListQuery> {
        Ok(AttendanceListQuery {
            date: parse_optional_date(request.date.as_deref())?,
            student_id: request.student_id,
            group_id: request.group_id,
        })
    }

    pub fn to_mark_response_dto(result: MarkAttendanceResult) -> MarkAttendanceResponse {
        let success_message = format!(
            "{} marked {} ({}% attendance)",
            result.student_name,
            match result.record.status {
                DomainStatus::Present => "present",
                DomainStatus::Absent => "absent",
                DomainStatus::Late => "late",
            },
            result.attendance_rate
        );
        MarkAttendanceResponse {
            record: Self::to_dto(result.record),
            attendance_rate: result.attendance_rate,
            success_message,
        }
    }

    pub fn to_list_dto(records: Vec<DomainRecord>) -> AttendanceListResponse {
        AttendanceListResponse {
            records: records.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_summary_dto(summary: DailySummary) -> AttendanceSummaryResponse {
        AttendanceSummaryResponse {
            group_id: summary.group_id,
            date: format_date(summary.date),
            attended: summary.attended,
            absent: summary.absent,
            not_marked: summary.not_marked,
        }
    }
}
