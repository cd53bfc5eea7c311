//! # REST API for the Dashboard
//!
//! Headline figures and alerts, the cache audit, the text insight and the
//! center reset.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use super::mappers::{parse_optional_date, GroupMapper, StudentMapper};
use super::{bad_request, domain_error_response, DateQuery};
use crate::domain::insight::student_snapshot;
use crate::AppState;
use shared::{InsightResponse, ResetCenterRequest};

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - query: {:?}", query);

    match parse_optional_date(query.date.as_deref()) {
        Ok(day) => {
            let summary = state.roster_view.dashboard(day);
            (StatusCode::OK, Json(GroupMapper::to_dashboard_dto(summary))).into_response()
        }
        Err(e) => bad_request("Invalid dashboard query", e),
    }
}

/// Report cached student fields that disagree with the logs
pub async fn audit(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/audit");

    let report = state.reconciliation_service.audit();
    (StatusCode::OK, Json(StudentMapper::to_audit_dto(report))).into_response()
}

pub async fn insight(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/insight");

    let snapshot = student_snapshot(&state.store);
    let insight = state.insight_provider.insight(&snapshot);
    (StatusCode::OK, Json(InsightResponse { insight })).into_response()
}

/// Start a new center, wiping every collection
pub async fn reset_center(
    State(state): State<AppState>,
    Json(request): Json<ResetCenterRequest>,
) -> impl IntoResponse {
    warn!("POST /api/reset - request: {:?}", request);

    match state.roster_service.reset_center(!request.empty) {
        Ok(outcome) => (StatusCode::OK, Json(GroupMapper::to_reset_dto(outcome))).into_response(),
        Err(e) => domain_error_response("Failed to reset center", e),
    }
}
