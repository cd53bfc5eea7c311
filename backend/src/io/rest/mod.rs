//! # REST API Interface Layer
//!
//! HTTP endpoints for the education center. This layer handles:
//! - JSON request/response serialization
//! - Date parsing at the boundary (malformed dates are a 400)
//! - Translating `DomainError` into status codes
//! - Request logging
//!
//! Handlers contain no business rules; they map DTOs to commands, call a
//! service and map the outcome back.

pub mod attendance_apis;
pub mod dashboard_apis;
pub mod group_apis;
pub mod ledger_apis;
pub mod mappers;
pub mod student_apis;

pub use attendance_apis::*;
pub use dashboard_apis::*;
pub use group_apis::*;
pub use ledger_apis::*;
pub use student_apis::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::domain::DomainError;

/// Query string for endpoints scoped to a single day
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::AlreadyMarked { .. } => StatusCode::CONFLICT,
        DomainError::UnknownStudent(_) | DomainError::UnknownGroup(_) => StatusCode::NOT_FOUND,
        DomainError::NotEnrolled { .. }
        | DomainError::NoEnrolledGroup(_)
        | DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
    }
}

pub fn domain_error_response(context: &str, error: DomainError) -> Response {
    warn!("{}: {}", context, error);
    (status_for(&error), error.to_string()).into_response()
}

/// Response for requests the mappers could not turn into a command
pub fn bad_request(context: &str, error: anyhow::Error) -> Response {
    error!("{}: {:#}", context, error);
    (StatusCode::BAD_REQUEST, format!("{:#}", error)).into_response()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_mapping() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let cases = [
            (
                DomainError::AlreadyMarked {
                    student_id: "s1".to_string(),
                    group_id: "g1".to_string(),
                    date,
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::UnknownStudent("s9".to_string()), StatusCode::NOT_FOUND),
            (DomainError::UnknownGroup("g9".to_string()), StatusCode::NOT_FOUND),
            (
                DomainError::NotEnrolled {
                    student_id: "s1".to_string(),
                    group_id: "g2".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::NoEnrolledGroup("s4".to_string()), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::InvalidAmount(0), StatusCode::BAD_REQUEST),
        ];
        for (error, expected) in cases {
            assert_eq!(status_for(&error), expected, "{:?}", error);
        }
    }
}
