use super::format_date;
use crate::domain::commands::roster::{
    CreateGroupCommand, DashboardAlert as DomainAlert, DashboardSummary as DomainDashboard,
    Occupancy, ResetOutcome, UpdateGroupCommand,
};
use crate::domain::models::group::{
    Delivery, Group as DomainGroup, GroupStatus as DomainGroupStatus, Pricing,
    ScheduleSlot as DomainSlot,
};
use shared::{
    AlertKind, CreateGroupRequest, DashboardAlert as SharedAlert,
    DashboardSummary as SharedDashboard, Group as SharedGroup, GroupDelivery, GroupListResponse,
    GroupOccupancy, GroupResponse, GroupStatus as SharedGroupStatus, OccupancyListResponse,
    PricingType, ResetCenterResponse, ScheduleSlot as SharedSlot, UpdateGroupRequest,
};

/// Mapper to convert between shared Group DTOs and domain Group models.
pub struct GroupMapper;

impl GroupMapper {
    fn delivery_to_domain(dto: GroupDelivery) -> Delivery {
        match dto {
            GroupDelivery::InPerson => Delivery::InPerson,
            GroupDelivery::Online => Delivery::Online,
            GroupDelivery::Hybrid => Delivery::Hybrid,
        }
    }

    fn delivery_to_dto(domain: Delivery) -> GroupDelivery {
        match domain {
            Delivery::InPerson => GroupDelivery::InPerson,
            Delivery::Online => GroupDelivery::Online,
            Delivery::Hybrid => GroupDelivery::Hybrid,
        }
    }

    fn pricing_to_domain(dto: PricingType) -> Pricing {
        match dto {
            PricingType::Monthly => Pricing::Monthly,
            PricingType::PerSession => Pricing::PerSession,
            PricingType::Package => Pricing::Package,
        }
    }

    fn pricing_to_dto(domain: Pricing) -> PricingType {
        match domain {
            Pricing::Monthly => PricingType::Monthly,
            Pricing::PerSession => PricingType::PerSession,
            Pricing::Package => PricingType::Package,
        }
    }

    fn status_to_domain(dto: SharedGroupStatus) -> DomainGroupStatus {
        match dto {
            SharedGroupStatus::Open => DomainGroupStatus::Open,
            SharedGroupStatus::Full => DomainGroupStatus::Full,
            SharedGroupStatus::Paused => DomainGroupStatus::Paused,
            SharedGroupStatus::Ended => DomainGroupStatus::Ended,
        }
    }

    fn status_to_dto(domain: DomainGroupStatus) -> SharedGroupStatus {
        match domain {
            DomainGroupStatus::Open => SharedGroupStatus::Open,
            DomainGroupStatus::Full => SharedGroupStatus::Full,
            DomainGroupStatus::Paused => SharedGroupStatus::Paused,
            DomainGroupStatus::Ended => SharedGroupStatus::Ended,
        }
    }

    fn slot_to_domain(dto: SharedSlot) -> DomainSlot {
        DomainSlot {
            day: dto.day,
            time: dto.time,
            room: dto.room,
        }
    }

    fn slot_to_dto(domain: DomainSlot) -> SharedSlot {
        SharedSlot {
            day: domain.day,
            time: domain.time,
            room: domain.room,
        }
    }

    pub fn to_dto(domain: DomainGroup) -> SharedGroup {
        SharedGroup {
            id: domain.id,
            name: domain.name,
            subject: domain.subject,
            grade: domain.grade,
            delivery: Self::delivery_to_dto(domain.delivery),
            pricing: Self::pricing_to_dto(domain.pricing),
            price: domain.price,
            capacity: domain.capacity,
            current_count: domain.current_count,
            status: Self::status_to_dto(domain.status),
            schedule: domain.schedule.into_iter().map(Self::slot_to_dto).collect(),
        }
    }

    pub fn to_group_list_dto(groups: Vec<DomainGroup>) -> GroupListResponse {
        GroupListResponse {
            groups: groups.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_group_response_dto(domain: DomainGroup, message: &str) -> GroupResponse {
        GroupResponse {
            group: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_create_command(request: CreateGroupRequest) -> CreateGroupCommand {
        CreateGroupCommand {
            name: request.name,
            subject: request.subject,
            grade: request.grade,
            delivery: Self::delivery_to_domain(request.delivery),
            pricing: Self::pricing_to_domain(request.pricing),
            price: request.price,
            capacity: request.capacity,
            schedule: request.schedule.into_iter().map(Self::slot_to_domain).collect(),
        }
    }

    pub fn to_update_command(group_id: String, request: UpdateGroupRequest) -> UpdateGroupCommand {
        UpdateGroupCommand {
            group_id,
            name: request.name,
            subject: request.subject,
            grade: request.grade,
            delivery: request.delivery.map(Self::delivery_to_domain),
            pricing: request.pricing.map(Self::pricing_to_domain),
            price: request.price,
            capacity: request.capacity,
            status: request.status.map(Self::status_to_domain),
            schedule: request
                .schedule
                .map(|slots| slots.into_iter().map(Self::slot_to_domain).collect()),
        }
    }

    pub fn to_occupancy_dto(occupancy: Occupancy) -> GroupOccupancy {
        GroupOccupancy {
            group_id: occupancy.group_id,
            group_name: occupancy.group_name,
            enrolled: occupancy.enrolled,
            capacity: occupancy.capacity,
            is_full: occupancy.is_full,
        }
    }

    pub fn to_occupancy_list_dto(occupancy: Vec<Occupancy>) -> OccupancyListResponse {
        OccupancyListResponse {
            groups: occupancy.into_iter().map(Self::to_occupancy_dto).collect(),
        }
    }

    pub fn to_dashboard_dto(summary: DomainDashboard) -> SharedDashboard {
        SharedDashboard {
            date: format_date(summary.date),
            student_count: summary.student_count,
            group_count: summary.group_count,
            average_attendance_rate: summary.average_attendance_rate,
            outstanding_debt: summary.outstanding_debt,
            income_on_day: summary.income_on_day,
            sessions_today: summary.sessions_today,
            alerts: summary.alerts.into_iter().map(Self::alert_to_dto).collect(),
        }
    }

    fn alert_to_dto(alert: DomainAlert) -> SharedAlert {
        match alert {
            DomainAlert::HighDebt { students } => SharedAlert {
                kind: AlertKind::Finance,
                count: students as u64,
                message: format!("{} students have high debts", students),
            },
            DomainAlert::LowAttendance { average, threshold } => SharedAlert {
                kind: AlertKind::Attendance,
                count: u64::from(average),
                message: format!(
                    "Average attendance is {}%, below the {}% target",
                    average, threshold
                ),
            },
            DomainAlert::SessionsToday { count } => SharedAlert {
                kind: AlertKind::Schedule,
                count: count as u64,
                message: format!("{} sessions scheduled today", count),
            },
        }
    }

    pub fn to_reset_dto(outcome: ResetOutcome) -> ResetCenterResponse {
        ResetCenterResponse {
            student_count: outcome.student_count,
            group_count: outcome.group_count,
            success_message: "Center data reset successfully".to_string(),
        }
    }
}
