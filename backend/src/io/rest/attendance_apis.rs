//! # REST API for Attendance
//!
//! Endpoints for marking attendance, scan-a-code admission, listing records
//! and per-group daily head counts.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::mappers::{parse_optional_date, AttendanceMapper};
use super::{bad_request, domain_error_response};
use crate::AppState;
use shared::{AttendanceListRequest, AttendanceSummaryRequest, MarkAttendanceRequest, QuickAdmitRequest};

pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceListRequest>,
) -> impl IntoResponse {
    info!("GET /api/attendance - query: {:?}", query);

    match AttendanceMapper::to_list_query(query) {
        Ok(query) => {
            let records = state.attendance_service.list_records(query);
            (StatusCode::OK, Json(AttendanceMapper::to_list_dto(records))).into_response()
        }
        Err(e) => bad_request("Invalid attendance query", e),
    }
}

/// Mark a student present, absent or late in one of their groups
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(request): Json<MarkAttendanceRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance - request: {:?}", request);

    let command = match AttendanceMapper::to_mark_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("Invalid attendance request", e),
    };

    match state.attendance_service.mark_attendance(command) {
        Ok(result) => (StatusCode::CREATED, Json(AttendanceMapper::to_mark_response_dto(result))).into_response(),
        Err(e) => domain_error_response("Failed to mark attendance", e),
    }
}

/// Admit a student by scanned code into their primary group
pub async fn quick_admit(
    State(state): State<AppState>,
    Json(request): Json<QuickAdmitRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance/quick - request: {:?}", request);

    let command = match AttendanceMapper::to_quick_admit_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("Invalid admission request", e),
    };

    match state.attendance_service.quick_admit(command) {
        Ok(result) => (StatusCode::CREATED, Json(AttendanceMapper::to_mark_response_dto(result))).into_response(),
        Err(e) => domain_error_response("Quick admission failed", e),
    }
}

pub async fn attendance_summary(
    State(state): State<AppState>,
    Query(query): Query<AttendanceSummaryRequest>,
) -> impl IntoResponse {
    info!("GET /api/attendance/summary - query: {:?}", query);

    let date = match parse_optional_date(query.date.as_deref()) {
        Ok(date) => date,
        Err(e) => return bad_request("Invalid summary query", e),
    };

    match state.attendance_service.daily_summary(&query.group_id, date) {
        Ok(summary) => (StatusCode::OK, Json(AttendanceMapper::to_summary_dto(summary))).into_response(),
        Err(e) => domain_error_response("Failed to summarize attendance", e),
    }
}
