//! # REST API for Student Management
//!
//! Endpoints for searching, creating, updating and deleting students, and for
//! rebuilding a student's cached fields from the logs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::mappers::StudentMapper;
use super::{bad_request, domain_error_response};
use crate::AppState;
use shared::{CreateStudentRequest, DeleteResponse, StudentSearchRequest, UpdateStudentRequest};

/// List students, optionally filtered by search text, status or group
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentSearchRequest>,
) -> impl IntoResponse {
    info!("GET /api/students - query: {:?}", query);

    let students = state.roster_view.search_students(&StudentMapper::to_filter(query));
    (StatusCode::OK, Json(StudentMapper::to_student_list_dto(students))).into_response()
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    let command = match StudentMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("Invalid student request", e),
    };

    match state.roster_service.create_student(command) {
        Ok(student) => (
            StatusCode::CREATED,
            Json(StudentMapper::to_student_response_dto(student, "Student created successfully")),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to create student", e),
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    let command = StudentMapper::to_update_command(student_id, request);
    match state.roster_service.update_student(command) {
        Ok(student) => (
            StatusCode::OK,
            Json(StudentMapper::to_student_response_dto(student, "Student updated successfully")),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to update student", e),
    }
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/students/{}", student_id);

    match state.roster_service.delete_student(&student_id) {
        Ok(student) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success_message: format!("Student {} deleted", student.name),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to delete student", e),
    }
}

/// Rebuild a student's attendance rate, balance and status from the logs
pub async fn recompute_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/recompute", student_id);

    match state.reconciliation_service.recompute(&student_id) {
        Ok(result) => (StatusCode::OK, Json(StudentMapper::to_recompute_dto(result))).into_response(),
        Err(e) => domain_error_response("Failed to recompute student", e),
    }
}
