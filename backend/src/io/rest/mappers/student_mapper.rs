use anyhow::Result;

use super::{format_date, parse_optional_date};
use crate::domain::commands::reconciliation::{AuditReport, RecomputeResult};
use crate::domain::commands::roster::{CreateStudentCommand, StudentFilter, UpdateStudentCommand};
use crate::domain::models::student::{
    Contact, CustomField as DomainCustomField, Student as DomainStudent, StudentStatus as DomainStudentStatus,
};
use shared::{
    AuditResponse, CacheDrift as SharedCacheDrift, CreateStudentRequest, CustomField as SharedCustomField,
    RecomputeResponse, Student as SharedStudent, StudentContact, StudentListResponse, StudentResponse,
    StudentSearchRequest, StudentStatus as SharedStudentStatus, UpdateStudentRequest,
};

/// Mapper to convert between shared Student DTOs and domain Student models.
pub struct StudentMapper;

impl StudentMapper {
    pub fn status_to_dto(status: DomainStudentStatus) -> SharedStudentStatus {
        match status {
            DomainStudentStatus::Active => SharedStudentStatus::Active,
            DomainStudentStatus::Suspended => SharedStudentStatus::Suspended,
            DomainStudentStatus::Debtor => SharedStudentStatus::Debtor,
        }
    }

    pub fn status_to_domain(status: SharedStudentStatus) -> DomainStudentStatus {
        match status {
            SharedStudentStatus::Active => DomainStudentStatus::Active,
            SharedStudentStatus::Suspended => DomainStudentStatus::Suspended,
            SharedStudentStatus::Debtor => DomainStudentStatus::Debtor,
        }
    }

    fn contact_to_domain(dto: StudentContact) -> Contact {
        Contact {
            relation: dto.relation,
            name: dto.name,
            phone: dto.phone,
        }
    }

    fn contact_to_dto(domain: Contact) -> StudentContact {
        StudentContact {
            relation: domain.relation,
            name: domain.name,
            phone: domain.phone,
        }
    }

    fn field_to_domain(dto: SharedCustomField) -> DomainCustomField {
        DomainCustomField {
            label: dto.label,
            value: dto.value,
        }
    }

    fn field_to_dto(domain: DomainCustomField) -> SharedCustomField {
        SharedCustomField {
            label: domain.label,
            value: domain.value,
        }
    }

    /// Converts a domain Student model to a shared Student DTO.
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            name: domain.name,
            phone: domain.phone,
            parent_phone: domain.parent_phone,
            group_ids: domain.group_ids,
            attendance_rate: domain.attendance_rate,
            balance: domain.balance,
            status: Self::status_to_dto(domain.status),
            notes: domain.notes,
            contacts: domain.contacts.into_iter().map(Self::contact_to_dto).collect(),
            custom_fields: domain.custom_fields.into_iter().map(Self::field_to_dto).collect(),
            join_date: format_date(domain.join_date),
        }
    }

    pub fn to_student_list_dto(students: Vec<DomainStudent>) -> StudentListResponse {
        StudentListResponse {
            students: students.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_student_response_dto(domain: DomainStudent, message: &str) -> StudentResponse {
        StudentResponse {
            student: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_filter(request: StudentSearchRequest) -> StudentFilter {
        StudentFilter {
            search: request.search,
            status: request.status.map(Self::status_to_domain),
            group_id: request.group_id,
        }
    }

    pub fn to_create_command(request: CreateStudentRequest) -> Result<CreateStudentCommand> {
        Ok(CreateStudentCommand {
            join_date: parse_optional_date(request.join_date.as_deref())?,
            name: request.name,
            phone: request.phone,
            parent_phone: request.parent_phone,
            group_ids: request.group_ids,
            notes: request.notes,
            contacts: request.contacts.into_iter().map(Self::contact_to_domain).collect(),
            custom_fields: request.custom_fields.into_iter().map(Self::field_to_domain).collect(),
        })
    }

    pub fn to_update_command(student_id: String, request: UpdateStudentRequest) -> UpdateStudentCommand {
        UpdateStudentCommand {
            student_id,
            name: request.name,
            phone: request.phone,
            parent_phone: request.parent_phone,
            group_ids: request.group_ids,
            notes: request.notes,
            contacts: request
                .contacts
                .map(|contacts| contacts.into_iter().map(Self::contact_to_domain).collect()),
            custom_fields: request
                .custom_fields
                .map(|fields| fields.into_iter().map(Self::field_to_domain).collect()),
            suspended: request.suspended,
        }
    }

    pub fn to_recompute_dto(result: RecomputeResult) -> RecomputeResponse {
        RecomputeResponse {
            student: Self::to_dto(result.student),
            changed: result.changed,
        }
    }

    pub fn to_audit_dto(report: AuditReport) -> AuditResponse {
        AuditResponse {
            drifts: report
                .drifts
                .into_iter()
                .map(|drift| SharedCacheDrift {
                    student_id: drift.student_id,
                    field: drift.field.to_string(),
                    cached: drift.cached,
                    expected: drift.expected,
                })
                .collect(),
            orphaned_records: report.orphaned_records,
            orphaned_transactions: report.orphaned_transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::seed_students;

    #[test]
    fn test_student_dto_uses_iso_join_date() {
        let student = seed_students().remove(0);
        let dto = StudentMapper::to_dto(student);
        assert_eq!(dto.join_date, "2023-09-01");
        assert_eq!(dto.status, SharedStudentStatus::Active);
        assert_eq!(dto.contacts[0].relation, "Father");
    }

    #[test]
    fn test_create_command_rejects_bad_join_date() {
        let request = CreateStudentRequest {
            name: "Omar".to_string(),
            phone: String::new(),
            parent_phone: String::new(),
            group_ids: Vec::new(),
            notes: String::new(),
            contacts: Vec::new(),
            custom_fields: Vec::new(),
            join_date: Some("yesterday".to_string()),
        };
        assert!(StudentMapper::to_create_command(request).is_err());
    }
}
