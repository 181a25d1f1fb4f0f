//! # Backend Module
//!
//! Contains all non-UI logic of the budget tracker.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (ledger, goal ranking, services)
//!     ↓
//! Storage Layer (document store, repositories)   Providers (identity, language model)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with proper CORS configuration
//! - Coordinate between domain logic, persistence and external providers

pub mod config;
pub mod domain;
pub mod io;
pub mod providers;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::config::Config;
use crate::backend::domain::{AccountService, ChatService, ChatSettings, GoalService, LedgerService};
use crate::backend::providers::{ChatModel, IdentityProvider, IdentityToolkitClient, OpenAiChatClient};
use crate::backend::storage::{DbConnection, DocumentStore, SqliteDocumentStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub ledger_service: LedgerService,
    pub goal_service: GoalService,
    pub account_service: AccountService,
    pub chat_service: ChatService,
}

impl AppState {
    /// Wire the services on top of the given collaborators
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        chat_model: Arc<dyn ChatModel>,
        chat_settings: ChatSettings,
    ) -> Self {
        let ledger_service = LedgerService::new(store.clone());
        let goal_service = GoalService::new(store.clone());
        let account_service = AccountService::new(identity, store);
        let chat_service = ChatService::new(chat_model, ledger_service.clone(), chat_settings);

        Self {
            ledger_service,
            goal_service,
            account_service,
            chat_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database_url).await?;
    let store = SqliteDocumentStore::new(db_conn);

    info!("Setting up providers");
    let identity = IdentityToolkitClient::new(
        config.identity_base_url.clone(),
        config.identity_api_key.clone(),
        config.identity_admin_token.clone(),
    )
    .context("Failed to build identity provider client")?;
    let chat_model = OpenAiChatClient::new(config.llm_base_url.clone(), config.llm_api_key.clone())
        .context("Failed to build language model client")?;

    info!("Setting up application state");
    Ok(AppState::new(
        Arc::new(store),
        Arc::new(identity),
        Arc::new(chat_model),
        ChatSettings {
            model_id: config.llm_model.clone(),
            idle_timeout: config.chat_session_idle,
            max_history: config.chat_max_history,
            max_sessions: config.chat_max_sessions,
        },
    ))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    // CORS setup to allow the frontend to make requests
    let origin: HeaderValue = cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/user", io::rest::user_apis::router())
        .merge(io::rest::transaction_apis::router())
        .nest("/goals", io::rest::goal_apis::router())
        .nest("/chat", io::rest::chat_apis::router())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_utils::{ScriptedChatModel, TestEnvironment};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn test_app() -> (Router, Arc<ScriptedChatModel>) {
        let env = TestEnvironment::new().await;
        let state = AppState::new(
            env.store,
            env.identity,
            env.chat_model.clone(),
            ChatSettings {
                model_id: "test-model".to_string(),
                idle_timeout: Duration::from_secs(600),
                max_history: 20,
                max_sessions: 100,
            },
        );
        (create_router(state, "http://localhost:8080").unwrap(), env.chat_model)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn registered_uid(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/user/register",
            Some(json!({ "email": "ada@example.com", "password": "hunter22", "name": "Ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["uid"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_check() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn register_login_and_profile() {
        let (app, _) = test_app().await;
        let uid = registered_uid(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/user/login",
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["uid"], uid.as_str());
        assert!(body["idToken"].is_string());

        let (status, body) = send(&app, "GET", &format!("/user/{}", uid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 10000.0);
        assert_eq!(body["name"], "Ada");

        let (status, body) = send(
            &app,
            "POST",
            "/user/login",
            Some(json!({ "email": "ada@example.com", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn ledger_round_trip() {
        let (app, _) = test_app().await;
        let uid = registered_uid(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/transactions/{}", uid),
            Some(json!({ "type": "expenditure", "amount": 42.5, "category": "food", "description": "groceries" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 9957.5);
        let period_key = body["periodKey"].as_str().unwrap().to_string();
        assert!(period_key.ends_with("_expenditure"));

        let month_year = &period_key[..7];
        let (status, body) = send(
            &app,
            "GET",
            &format!("/transactions/{}?type=expenditure&monthYear={}", uid, month_year),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(body["transactions"][0]["category"], "food");

        let (status, body) = send(&app, "GET", &format!("/balance/{}", uid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 9957.5);

        let (status, body) = send(&app, "GET", &format!("/summary/{}?monthYear={}", uid, month_year), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalExpenditure"], 42.5);
        assert_eq!(body["expenditureByCategory"][0]["category"], "food");
    }

    #[tokio::test]
    async fn oversized_month_totals_return_json_error() {
        let (app, _) = test_app().await;
        let uid = registered_uid(&app).await;

        let mut month_year = String::new();
        for entry in [
            json!({ "type": "income", "amount": "70000000000000000000000000000" }),
            json!({ "type": "expenditure", "amount": "70000000000000000000000000000", "category": "bills" }),
            json!({ "type": "income", "amount": "70000000000000000000000000000" }),
        ] {
            let (status, body) = send(&app, "POST", &format!("/transactions/{}", uid), Some(entry)).await;
            assert_eq!(status, StatusCode::OK);
            month_year = body["periodKey"].as_str().unwrap()[..7].to_string();
        }

        let (status, body) = send(&app, "GET", &format!("/summary/{}?monthYear={}", uid, month_year), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_input_yields_json_errors() {
        let (app, _) = test_app().await;
        let uid = registered_uid(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/transactions/{}", uid),
            Some(json!({ "type": "gift", "amount": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("gift"));

        let (status, body) = send(&app, "GET", &format!("/transactions/{}?type=income", uid), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/transactions/{}", uid))
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", &format!("/balance/{}", uid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 10000.0);
    }

    #[tokio::test]
    async fn unknown_account_is_404() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, "GET", "/balance/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app,
            "POST",
            "/transactions/ghost",
            Some(json!({ "type": "income", "amount": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn goals_and_top_goal() {
        let (app, _) = test_app().await;
        let uid = registered_uid(&app).await;

        let (status, body) = send(&app, "GET", &format!("/goals/{}/top", uid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["goal"].is_null());
        assert!(body["message"].is_string());

        for (name, amount, difficulty) in [("a", 100, "hard"), ("b", 500, "medium"), ("c", 50, "hard")] {
            let (status, _) = send(
                &app,
                "POST",
                &format!("/goals/{}", uid),
                Some(json!({ "goalName": name, "targetAmount": amount, "difficulty": difficulty })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&app, "GET", &format!("/goals/{}", uid), None).await;
        assert_eq!(body["goals"].as_array().unwrap().len(), 3);

        let (status, body) = send(&app, "GET", &format!("/goals/{}/top", uid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"]["goalName"], "a");
        assert_eq!(body["goal"]["difficulty"], "hard");
    }

    #[tokio::test]
    async fn chat_endpoints() {
        let (app, model) = test_app().await;
        model.push_reply(r#"{"recordType":"income","amount":20,"source":"gift"}"#);
        model.push_reply("Save a little every week.");

        let (status, body) = send(&app, "POST", "/chat/extract", Some(json!({ "message": "grandma gave me 20" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recordType"], "income");
        assert_eq!(body["amount"], 20.0);

        let (status, body) = send(&app, "POST", "/chat/budget", Some(json!({ "message": "tips?" }))).await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["sessionId"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "DELETE", &format!("/chat/budget/{}", session_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ended"], true);

        let (status, _) = send(&app, "POST", "/chat/extract", Some(json!({ "message": "no reply left" }))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
