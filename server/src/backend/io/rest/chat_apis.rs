//! # REST API for the Chat Features

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, post},
    Router,
};
use shared::{
    BudgetChatRequest, BudgetChatResponse, EndChatResponse, ExtractTransactionRequest,
    ExtractTransactionResponse,
};
use tracing::{error, info};

use crate::backend::domain::commands::chat::BudgetChatCommand;
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

/// Create a router for chat related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/extract", post(extract_transaction))
        .route("/budget", post(budget_chat))
        .route("/budget/:session_id", delete(end_budget_chat))
}

/// Read a transaction out of a free-text message
pub async fn extract_transaction(
    State(state): State<AppState>,
    payload: Result<Json<ExtractTransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /chat/extract");

    match state.chat_service.extract_transaction(&request.message).await {
        Ok(entry) => {
            let response = ExtractTransactionResponse {
                record_type: entry.record_type.as_str().to_string(),
                amount: entry.amount,
                category: entry.category.map(|c| c.as_str().to_string()),
                source: entry.source,
                description: entry.description,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to extract transaction: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn budget_chat(
    State(state): State<AppState>,
    payload: Result<Json<BudgetChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /chat/budget - session: {:?}", request.session_id);

    let command = BudgetChatCommand {
        session_id: request.session_id,
        uid: request.uid,
        message: request.message,
    };

    match state.chat_service.budget_chat(command).await {
        Ok(result) => {
            let response = BudgetChatResponse {
                session_id: result.session_id,
                reply: result.reply,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Budget chat failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn end_budget_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /chat/budget/{}", session_id);

    let ended = state.chat_service.end_session(&session_id).await;
    (StatusCode::OK, Json(EndChatResponse { session_id, ended }))
}
