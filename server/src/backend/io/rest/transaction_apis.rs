//! # REST API for the Ledger
//!
//! Recording entries and reading period buckets, the balance and monthly
//! summaries.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{BalanceResponse, CreateEntryRequest, MonthSummaryRequest, TransactionListRequest};
use tracing::{error, info};

use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::entry_mapper::EntryMapper;
use crate::backend::AppState;

/// Create a router for ledger related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions/:uid", get(list_transactions).post(record_transaction))
        .route("/balance/:uid", get(get_balance))
        .route("/summary/:uid", get(get_month_summary))
}

/// Record an income or expenditure entry
pub async fn record_transaction(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /transactions/{} - request: {:?}", uid, request);

    let command = EntryMapper::to_record_command(uid, request);

    match state.ledger_service.record_entry(command).await {
        Ok(result) => {
            let response = EntryMapper::to_create_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to record transaction: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// List one period bucket: `?type=income&monthYear=04-2025`
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    query: Result<Query<TransactionListRequest>, QueryRejection>,
) -> impl IntoResponse {
    let Query(request) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("GET /transactions/{} - query: {:?}", uid, request);

    let query = EntryMapper::to_list_query(uid, request);

    match state.ledger_service.get_transactions(query).await {
        Ok(result) => {
            let response = EntryMapper::to_list_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_balance(State(state): State<AppState>, Path(uid): Path<String>) -> impl IntoResponse {
    info!("GET /balance/{}", uid);

    match state.ledger_service.get_balance(&uid).await {
        Ok(balance) => (StatusCode::OK, Json(BalanceResponse { uid, balance })).into_response(),
        Err(e) => {
            error!("Failed to get balance: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Income, expenditure and per-category totals of one month
pub async fn get_month_summary(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    query: Result<Query<MonthSummaryRequest>, QueryRejection>,
) -> impl IntoResponse {
    let Query(request) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("GET /summary/{} - query: {:?}", uid, request);

    let query = EntryMapper::to_summary_query(uid, request.month_year);

    match state.ledger_service.month_summary(query).await {
        Ok(summary) => {
            let response = EntryMapper::to_summary_response(summary);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to summarise month: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
