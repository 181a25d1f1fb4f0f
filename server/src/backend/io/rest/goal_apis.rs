//! # REST API for Goal Management
//!
//! Endpoints for creating and listing goals and for picking the next one.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateGoalRequest, CreateGoalResponse};
use tracing::{error, info};

use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::goal_mapper::GoalMapper;
use crate::backend::AppState;

/// Create a router for goal related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:uid", get(list_goals).post(create_goal))
        .route("/:uid/top", get(get_top_goal))
}

/// Create a new goal
pub async fn create_goal(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<CreateGoalRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /goals/{} - request: {:?}", uid, request);

    let command = GoalMapper::to_create_command(uid, request);

    match state.goal_service.add_goal(command).await {
        Ok(goal) => {
            let response = CreateGoalResponse {
                message: "Goal created".to_string(),
                goal: GoalMapper::to_dto(goal),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create goal: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn list_goals(State(state): State<AppState>, Path(uid): Path<String>) -> impl IntoResponse {
    info!("GET /goals/{}", uid);

    match state.goal_service.list_goals(&uid).await {
        Ok(goals) => (StatusCode::OK, Json(GoalMapper::to_list_response(goals))).into_response(),
        Err(e) => {
            error!("Failed to list goals: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// The goal to work on next
pub async fn get_top_goal(State(state): State<AppState>, Path(uid): Path<String>) -> impl IntoResponse {
    info!("GET /goals/{}/top", uid);

    match state.goal_service.top_goal(&uid).await {
        Ok(result) => (StatusCode::OK, Json(GoalMapper::to_top_response(result))).into_response(),
        Err(e) => {
            error!("Failed to get top goal: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
