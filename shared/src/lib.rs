//! Request and response types exchanged between the budget tracker server and
//! its clients. Field names follow the camelCase convention of the JSON API.
//!
//! Monetary values are `rust_decimal::Decimal` on the wire side as well; they
//! serialize as JSON numbers. Inbound amounts are kept as raw JSON values so
//! the server can reject malformed input with its own error payload instead
//! of a deserializer rejection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name; empty when omitted
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Token lifetime in seconds, as reported by the identity provider
    pub expires_in: String,
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Body of `POST /transactions/:uid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    /// "income" or "expenditure"
    #[serde(default, alias = "type")]
    pub record_type: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub amount: Option<Value>,
    /// Required for expenditure entries
    #[serde(default)]
    pub category: Option<String>,
    /// Where the money came from; income entries only
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A recorded ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub record_type: String,
    pub category: Option<String>,
    pub source: Option<String>,
    pub description: String,
    /// RFC 3339, UTC
    pub recorded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryResponse {
    pub message: String,
    pub entry: Entry,
    pub period_key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Query string of `GET /transactions/:uid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListRequest {
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    /// "MM-YYYY"
    #[serde(default)]
    pub month_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub period_key: String,
    pub transactions: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub uid: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Query string of `GET /summary/:uid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummaryRequest {
    #[serde(default)]
    pub month_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummaryResponse {
    pub month_year: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenditure: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    pub income_count: usize,
    pub expenditure_count: usize,
    /// Only categories with at least one expenditure, in declaration order
    pub expenditure_by_category: Vec<CategoryTotal>,
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// Body of `POST /goals/:uid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[serde(default)]
    pub goal_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_amount: Option<Value>,
    /// "easy", "medium" or "hard"; medium when omitted
    #[serde(default)]
    pub difficulty: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD date
    #[serde(default)]
    pub deadline_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub goal_name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_saving: Decimal,
    pub completed: bool,
    pub difficulty: String,
    pub created_date: String,
    pub deadline_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGoalResponse {
    pub message: String,
    pub goal: Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalListResponse {
    pub goals: Vec<Goal>,
}

/// Either the top-priority goal or a message saying there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGoalResponse {
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractTransactionRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTransactionResponse {
    pub record_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: Option<String>,
    pub source: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetChatRequest {
    /// Omit on the first message to start a new conversation
    #[serde(default)]
    pub session_id: Option<String>,
    /// When given on the first message, the assistant is told the balance
    #[serde(default)]
    pub uid: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetChatResponse {
    pub session_id: String,
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndChatResponse {
    pub session_id: String,
    pub ended: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
