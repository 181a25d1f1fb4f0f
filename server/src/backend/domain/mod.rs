//! # Domain Module
//!
//! Contains all business logic of the budget tracker.
//!
//! ## Module Organization
//!
//! - **period_key**: derives the bucket id `{MM}-{YYYY}_{recordType}` of an entry
//! - **ledger**: appends entries and keeps the running balance consistent with them
//! - **goal_ranker**: orders incomplete goals and selects the next one
//! - **ledger_service / goal_service / account_service**: load state, run the
//!   pure logic above and persist the result
//! - **chat_service**: transaction extraction and budgeting conversations
//!
//! ## Business Rules
//!
//! - Every account starts with a balance of 10000
//! - `balance == 10000 + Σ income - Σ expenditure` at all times
//! - Entries are immutable and kept in recording order per period bucket
//! - Hard goals rank before medium before easy; larger targets break ties
//! - Input is validated before any state is touched

pub mod account_service;
pub mod chat_service;
pub mod commands;
pub mod errors;
pub mod goal_ranker;
pub mod goal_service;
pub mod ledger;
pub mod ledger_service;
pub mod models;
pub mod period_key;

pub use account_service::AccountService;
pub use chat_service::{ChatService, ChatSettings};
pub use errors::{DomainError, DomainResult};
pub use goal_service::GoalService;
pub use ledger_service::LedgerService;
pub use period_key::{MonthYear, PeriodKey};
