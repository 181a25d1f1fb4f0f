//! # Chat Service
//!
//! Language-model features layered on top of the ledger:
//!
//! - **Extraction**: turn a free-text message ("spent 12 on lunch") into a
//!   validated ledger entry the client can confirm and record
//! - **Budget chat**: a short advisory conversation
//!
//! ## Sessions
//!
//! Every conversation has its own transcript keyed by session id. A session
//! starts with the first message (an id is generated when the caller has
//! none), is evicted after sitting idle for the configured timeout or when
//! too many newer sessions are live, and can be ended explicitly. Transcripts are capped; the system prompt is always
//! kept. The session map is never locked while the model is answering.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::domain::commands::chat::{BudgetChatCommand, BudgetChatResult};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::ledger_service::LedgerService;
use crate::backend::domain::models::{ChatMessage, Entry};
use crate::backend::providers::ChatModel;

const EXTRACTION_PROMPT: &str = "You turn a short message about money into one JSON object and \
nothing else. Fields: \"recordType\" (\"income\" or \"expenditure\"), \"amount\" (a non-negative \
number), \"category\" (for expenditure only, one of: food, entertainment, shopping, travel, bills, \
daily_utilities), \"source\" (for income only, where the money came from), \"description\" (a few \
words). Use null for fields that do not apply.";

const BUDGET_PROMPT: &str = "You are a friendly budgeting assistant. Give short, practical advice \
about saving, spending and planning. Do not invent figures the user has not given you.";

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model_id: String,
    pub idle_timeout: Duration,
    /// Upper bound on a transcript's length, system prompt included
    pub max_history: usize,
    /// Live sessions kept at once; starting one more evicts the least
    /// recently active
    pub max_sessions: usize,
}

struct Session {
    messages: Vec<ChatMessage>,
    last_active: Instant,
}

/// Shape the extraction prompt asks the model for
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedTransaction {
    #[serde(alias = "type")]
    record_type: Option<String>,
    amount: Option<Value>,
    category: Option<String>,
    source: Option<String>,
    description: Option<String>,
}

#[derive(Clone)]
pub struct ChatService {
    model: Arc<dyn ChatModel>,
    ledger: LedgerService,
    settings: ChatSettings,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl ChatService {
    pub fn new(model: Arc<dyn ChatModel>, ledger: LedgerService, settings: ChatSettings) -> Self {
        Self {
            model,
            ledger,
            settings,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Ask the model to read a transaction out of `message`.
    ///
    /// The entry is validated like any recorded entry but not stored. A reply
    /// that is not a valid transaction is an upstream failure.
    pub async fn extract_transaction(&self, message: &str) -> DomainResult<Entry> {
        info!("Extracting transaction from message ({} chars)", message.len());

        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::invalid("message is required"));
        }

        let transcript = [ChatMessage::system(EXTRACTION_PROMPT), ChatMessage::user(message)];
        let reply = self
            .model
            .complete(&self.settings.model_id, &transcript)
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        parse_extraction(&reply)
    }

    /// One turn of a budgeting conversation
    pub async fn budget_chat(&self, command: BudgetChatCommand) -> DomainResult<BudgetChatResult> {
        self.budget_chat_at(command, Instant::now()).await
    }

    /// End a conversation. Returns false when the session was unknown or had
    /// already expired.
    pub async fn end_session(&self, session_id: &str) -> bool {
        self.end_session_at(session_id, Instant::now()).await
    }

    async fn budget_chat_at(&self, command: BudgetChatCommand, now: Instant) -> DomainResult<BudgetChatResult> {
        let message = command.message.trim().to_string();
        if message.is_empty() {
            return Err(DomainError::invalid("message is required"));
        }
        let session_id = command
            .session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let existing = {
            let mut sessions = self.sessions.lock().await;
            self.evict_idle(&mut sessions, now);
            sessions.get(&session_id).map(|s| s.messages.clone())
        };

        let mut transcript = match existing {
            Some(messages) => messages,
            None => {
                info!("Starting budget chat session {}", session_id);
                vec![ChatMessage::system(self.opening_prompt(command.uid.as_deref()).await?)]
            }
        };
        transcript.push(ChatMessage::user(message.clone()));

        let reply = self
            .model
            .complete(&self.settings.model_id, &transcript)
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(&session_id) {
            self.evict_least_recent(&mut sessions);
        }
        let session = sessions.entry(session_id.clone()).or_insert_with(|| Session {
            messages: transcript[..transcript.len() - 1].to_vec(),
            last_active: now,
        });
        session.messages.push(ChatMessage::user(message));
        session.messages.push(ChatMessage::assistant(reply.clone()));
        session.last_active = now;
        cap_history(&mut session.messages, self.settings.max_history);
        debug!("Session {} holds {} messages", session_id, session.messages.len());

        Ok(BudgetChatResult { session_id, reply })
    }

    async fn end_session_at(&self, session_id: &str, now: Instant) -> bool {
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions, now);
        let ended = sessions.remove(session_id).is_some();
        info!("Ending budget chat session {} (found: {})", session_id, ended);
        ended
    }

    async fn opening_prompt(&self, uid: Option<&str>) -> DomainResult<String> {
        match uid.map(str::trim).filter(|u| !u.is_empty()) {
            Some(uid) => {
                let balance = self.ledger.get_balance(uid).await?;
                Ok(format!("{} The user's current balance is {}.", BUDGET_PROMPT, balance))
            }
            None => Ok(BUDGET_PROMPT.to_string()),
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<String, Session>, now: Instant) {
        let idle_timeout = self.settings.idle_timeout;
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_active) < idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle chat sessions", evicted);
        }
    }

    /// Make room for one more session
    fn evict_least_recent(&self, sessions: &mut HashMap<String, Session>) {
        let limit = self.settings.max_sessions.max(1);
        while sessions.len() >= limit {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_active)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    info!("Session limit reached, evicted budget chat session {}", id);
                }
                None => break,
            }
        }
    }
}

/// Drop the oldest user/assistant pairs until at most `max_history`
/// messages remain, keeping the system prompt
fn cap_history(messages: &mut Vec<ChatMessage>, max_history: usize) {
    if messages.len() <= max_history {
        return;
    }
    let mut excess = messages.len() - max_history;
    excess += excess % 2;
    let excess = excess.min(messages.len() - 1);
    messages.drain(1..1 + excess);
}

/// Models like to wrap JSON in markdown fences
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

fn parse_extraction(reply: &str) -> DomainResult<Entry> {
    let extracted: ExtractedTransaction = serde_json::from_str(strip_code_fence(reply)).map_err(|e| {
        warn!("Model reply is not a transaction: {}", e);
        DomainError::upstream(format!("language model reply is not a transaction: {}", e))
    })?;

    let amount = extracted.amount.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    });
    let category = extracted
        .category
        .map(|c| c.trim().to_lowercase().replace(' ', "_"));

    let record_type = extracted.record_type.map(|t| t.trim().to_lowercase());

    Entry::parse(
        record_type.as_deref(),
        amount.as_deref(),
        category.as_deref(),
        extracted.source,
        extracted.description,
        Utc::now(),
    )
    .map_err(|e| DomainError::upstream(format!("language model reply is not a valid transaction: {}", e)))
}
