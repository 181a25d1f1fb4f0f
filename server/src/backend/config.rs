//! Server configuration, read from the environment (and `.env` if present).

use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

use crate::backend::providers::chat_model::{DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use crate::backend::providers::identity::DEFAULT_IDENTITY_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub cors_origin: String,
    pub identity_base_url: String,
    pub identity_api_key: String,
    pub identity_admin_token: Option<String>,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub chat_session_idle: Duration,
    pub chat_max_history: usize,
    pub chat_max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let listen_addr = or("BUDGET_LISTEN_ADDR", "127.0.0.1:3000")
            .parse()
            .context("Invalid BUDGET_LISTEN_ADDR")?;
        let identity_api_key = get("FIREBASE_API_KEY")
            .ok_or_else(|| anyhow!("FIREBASE_API_KEY must be set"))?;

        let idle_secs: u64 = or("CHAT_SESSION_IDLE_SECS", "1800")
            .parse()
            .context("Invalid CHAT_SESSION_IDLE_SECS")?;
        let chat_max_history: usize = or("CHAT_MAX_HISTORY", "40")
            .parse()
            .context("Invalid CHAT_MAX_HISTORY")?;
        let chat_max_sessions: usize = or("CHAT_MAX_SESSIONS", "1000")
            .parse()
            .context("Invalid CHAT_MAX_SESSIONS")?;

        Ok(Self {
            listen_addr,
            database_url: or("BUDGET_DATABASE_URL", "sqlite:budget.db"),
            cors_origin: or("BUDGET_CORS_ORIGIN", "http://localhost:8080"),
            identity_base_url: or("IDENTITY_BASE_URL", DEFAULT_IDENTITY_BASE_URL),
            identity_api_key,
            identity_admin_token: get("IDENTITY_ADMIN_TOKEN"),
            llm_base_url: or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_api_key: get("LLM_API_KEY"),
            llm_model: or("LLM_MODEL", DEFAULT_LLM_MODEL),
            chat_session_idle: Duration::from_secs(idle_secs),
            chat_max_history,
            chat_max_sessions,
        })
    }
}
