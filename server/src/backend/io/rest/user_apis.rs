//! # REST API for User Accounts
//!
//! Registration, login and the profile view. Credentials are checked by the
//! identity provider; tokens are handed back to the client unchanged.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse};
use tracing::{error, info};

use crate::backend::domain::commands::account::{LoginCommand, RegisterCommand};
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

/// Create a router for user related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/:uid", get(get_profile))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /user/register - email: {}", request.email);

    let command = RegisterCommand {
        email: request.email,
        password: request.password,
        name: request.name,
    };

    match state.account_service.register(command).await {
        Ok(uid) => {
            let response = RegisterResponse {
                message: "User registered".to_string(),
                uid,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to register user: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!("POST /user/login - email: {}", request.email);

    let command = LoginCommand {
        email: request.email,
        password: request.password,
    };

    match state.account_service.login(command).await {
        Ok(sign_in) => {
            let response = LoginResponse {
                message: "Login successful".to_string(),
                id_token: sign_in.id_token,
                refresh_token: sign_in.refresh_token,
                expires_in: sign_in.expires_in,
                uid: sign_in.uid,
                email: sign_in.email,
                name: sign_in.display_name,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Login failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Profile with current balance
pub async fn get_profile(State(state): State<AppState>, Path(uid): Path<String>) -> impl IntoResponse {
    info!("GET /user/{}", uid);

    match state.account_service.profile(&uid).await {
        Ok(profile) => {
            let response = ProfileResponse {
                uid: profile.uid,
                email: profile.email,
                name: profile.name,
                balance: profile.balance,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to get profile for {}: {}", uid, e);
            ApiError::from(e).into_response()
        }
    }
}
