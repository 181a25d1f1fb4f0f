//! # Ledger Service
//!
//! Account façade for the ledger: loads the account document, runs the
//! ledger accumulator on it and persists the result.
//!
//! ## Consistency
//!
//! `record_entry` validates everything before touching storage, then applies
//! the entry inside one transactional update of `users/{uid}`. Entry log and
//! balance are written together, and concurrent entries for the same account
//! are serialised by the store, so no update is ever lost.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::ledger::{
    MonthSummaryQuery, RecordEntryCommand, RecordEntryResult, TransactionListQuery,
    TransactionListResult,
};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::ledger::{apply_entry, replay_balance, summarize_month, MonthSummary};
use crate::backend::domain::models::{Account, Entry, RecordType};
use crate::backend::domain::period_key::{MonthYear, PeriodKey};
use crate::backend::storage::{AccountRepository, DocumentStore};

#[derive(Clone)]
pub struct LedgerService {
    accounts: AccountRepository,
}

impl LedgerService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            accounts: AccountRepository::new(store),
        }
    }

    /// Record an income or expenditure entry and move the balance with it
    pub async fn record_entry(&self, command: RecordEntryCommand) -> DomainResult<RecordEntryResult> {
        info!("Recording entry: {:?}", command);

        let entry = Entry::parse(
            command.record_type.as_deref(),
            command.amount.as_deref(),
            command.category.as_deref(),
            command.source,
            command.description,
            Utc::now(),
        )?;
        let period_key = PeriodKey::for_timestamp(entry.record_type, entry.recorded_at);

        let appended = entry.clone();
        let account = self
            .accounts
            .modify(&command.uid, move |account| {
                apply_entry(account, appended.clone()).map(|(account, _)| account)
            })
            .await?
            .ok_or_else(|| account_not_found(&command.uid))?;

        info!(
            "Recorded {} {} for {} in {}, balance now {}",
            entry.record_type, entry.amount, command.uid, period_key, account.balance
        );

        Ok(RecordEntryResult {
            entry,
            period_key,
            balance: account.balance,
        })
    }

    /// Entries of one period bucket; an absent bucket is an empty list
    pub async fn get_transactions(&self, query: TransactionListQuery) -> DomainResult<TransactionListResult> {
        info!("Listing transactions: {:?}", query);

        let record_type: RecordType = query
            .record_type
            .as_deref()
            .ok_or_else(|| DomainError::invalid("type is required"))?
            .parse()?;
        let period: MonthYear = query
            .month_year
            .as_deref()
            .ok_or_else(|| DomainError::invalid("monthYear is required"))?
            .parse()?;
        let period_key = PeriodKey::for_period(record_type, period);

        let account = self.load_account(&query.uid).await?;
        let entries = account.bucket(&period_key).to_vec();

        Ok(TransactionListResult { period_key, entries })
    }

    pub async fn get_balance(&self, uid: &str) -> DomainResult<Decimal> {
        info!("Getting balance for {}", uid);

        let account = self.load_account(uid).await?;
        match replay_balance(&account) {
            Some(replayed) if replayed != account.balance => warn!(
                "Balance of {} is {} but its entries add up to {}",
                uid, account.balance, replayed
            ),
            None => warn!("Entries of {} overflow when replayed", uid),
            _ => {}
        }

        Ok(account.balance)
    }

    /// Totals for one month, the current UTC month when none is given
    pub async fn month_summary(&self, query: MonthSummaryQuery) -> DomainResult<MonthSummary> {
        info!("Summarising month: {:?}", query);

        let period = match query.month_year.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(text) => text.parse()?,
            None => MonthYear::of(Utc::now()),
        };

        let account = self.load_account(&query.uid).await?;
        summarize_month(&account, period)
    }

    async fn load_account(&self, uid: &str) -> DomainResult<Account> {
        self.accounts
            .get(uid)
            .await?
            .ok_or_else(|| account_not_found(uid))
    }
}

pub(crate) fn account_not_found(uid: &str) -> DomainError {
    DomainError::not_found(format!("No account found for uid {}", uid))
}
