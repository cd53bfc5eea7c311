//! # REST API for Group Management
//!
//! Endpoints for listing, creating, updating and deleting groups, and for
//! enrollment-based occupancy.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::domain_error_response;
use super::mappers::GroupMapper;
use crate::AppState;
use shared::{CreateGroupRequest, DeleteResponse, UpdateGroupRequest};

pub async fn list_groups(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/groups");

    let groups = state.roster_view.groups();
    info!("Found {} groups", groups.len());
    (StatusCode::OK, Json(GroupMapper::to_group_list_dto(groups))).into_response()
}

pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    info!("POST /api/groups - request: {:?}", request);

    match state.roster_service.create_group(GroupMapper::to_create_command(request)) {
        Ok(group) => (
            StatusCode::CREATED,
            Json(GroupMapper::to_group_response_dto(group, "Group created successfully")),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to create group", e),
    }
}

pub async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> impl IntoResponse {
    info!("PUT /api/groups/{} - request: {:?}", group_id, request);

    match state.roster_service.update_group(GroupMapper::to_update_command(group_id, request)) {
        Ok(group) => (
            StatusCode::OK,
            Json(GroupMapper::to_group_response_dto(group, "Group updated successfully")),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to update group", e),
    }
}

/// Delete a group and unenroll its students
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/groups/{}", group_id);

    match state.roster_service.delete_group(&group_id) {
        Ok(group) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success_message: format!("Group {} deleted", group.name),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to delete group", e),
    }
}

pub async fn list_occupancy(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/groups/occupancy");

    let occupancy = state.roster_view.all_occupancy();
    (StatusCode::OK, Json(GroupMapper::to_occupancy_list_dto(occupancy))).into_response()
}

pub async fn get_occupancy(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/occupancy", group_id);

    match state.roster_view.occupancy(&group_id) {
        Ok(occupancy) => (StatusCode::OK, Json(GroupMapper::to_occupancy_dto(occupancy))).into_response(),
        Err(e) => domain_error_response("Failed to compute occupancy", e),
    }
}
