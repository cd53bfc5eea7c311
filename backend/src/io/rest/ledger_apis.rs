//! # REST API for the Ledger
//!
//! Endpoints for recording payments and debts, listing the transaction log
//! and summarizing income and outstanding debt.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::mappers::{parse_optional_date, TransactionMapper};
use super::{bad_request, domain_error_response, DateQuery};
use crate::AppState;
use shared::{RecordTransactionRequest, TransactionListRequest};

/// List transactions, most recent first
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListRequest>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let transactions = state
        .ledger_service
        .list_transactions(TransactionMapper::to_list_query(query));
    (StatusCode::OK, Json(TransactionMapper::to_list_dto(transactions))).into_response()
}

/// Record a payment or a debt against a student's balance
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(request): Json<RecordTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = match TransactionMapper::to_record_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("Invalid transaction request", e),
    };

    match state.ledger_service.record_transaction(command) {
        Ok(result) => (
            StatusCode::CREATED,
            Json(TransactionMapper::to_record_response_dto(result)),
        )
            .into_response(),
        Err(e) => domain_error_response("Failed to record transaction", e),
    }
}

pub async fn financial_summary(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    info!("GET /api/finances/summary - query: {:?}", query);

    match parse_optional_date(query.date.as_deref()) {
        Ok(day) => {
            let summary = state.ledger_service.financial_summary(day);
            (StatusCode::OK, Json(TransactionMapper::to_summary_dto(summary))).into_response()
        }
        Err(e) => bad_request("Invalid summary query", e),
    }
}
