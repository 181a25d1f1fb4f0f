//! Ledger accumulation.
//!
//! An account's ledger is a map of period-keyed entry buckets plus a cached
//! running balance. `apply_entry` is the only way an entry gets into the
//! ledger and it always moves the balance in the same step, so the balance
//! never drifts from the entry log:
//!
//! `balance == INITIAL_BALANCE + Σ income - Σ expenditure`
//!
//! Everything here is pure; persistence and atomicity live in the
//! `LedgerService`, which runs `apply_entry` inside a single transactional
//! document update.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::models::{Account, Category, Entry, RecordType, INITIAL_BALANCE};
use crate::backend::domain::period_key::{MonthYear, PeriodKey};

/// Append `entry` to its period bucket and move the balance by its amount.
///
/// Returns the updated account and the key of the bucket the entry went
/// into. On error the input account is dropped untouched; callers holding a
/// copy of the previous state keep it unchanged.
pub fn apply_entry(mut account: Account, entry: Entry) -> DomainResult<(Account, PeriodKey)> {
    let new_balance = match entry.record_type {
        RecordType::Income => account.balance.checked_add(entry.amount),
        RecordType::Expenditure => account.balance.checked_sub(entry.amount),
    }
    .ok_or_else(|| DomainError::invalid("amount is too large for the account balance"))?;

    let key = PeriodKey::for_timestamp(entry.record_type, entry.recorded_at);
    account.entries.entry(key.clone()).or_default().push(entry);
    account.balance = new_balance;

    Ok((account, key))
}

/// Recompute the balance from the entry log.
///
/// Returns `None` if the sum overflows, which can only happen with a
/// corrupted document.
pub fn replay_balance(account: &Account) -> Option<Decimal> {
    account
        .entries
        .values()
        .flatten()
        .try_fold(INITIAL_BALANCE, |balance, entry| {
            balance.checked_add(entry.signed_amount())
        })
}

/// Totals of one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub period: MonthYear,
    pub total_income: Decimal,
    pub total_expenditure: Decimal,
    pub net: Decimal,
    pub income_count: usize,
    pub expenditure_count: usize,
    pub expenditure_by_category: BTreeMap<Category, Decimal>,
}

fn summary_overflow() -> DomainError {
    DomainError::invalid("monthly totals are too large to summarize")
}

fn checked_total(entries: &[Entry]) -> DomainResult<Decimal> {
    entries
        .iter()
        .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.amount))
        .ok_or_else(summary_overflow)
}

/// Totals of one month. Every balance along the way fits a `Decimal`, but
/// the bucket sums need not, so overflow is reported instead of assumed away.
pub fn summarize_month(account: &Account, period: MonthYear) -> DomainResult<MonthSummary> {
    let income = account.bucket(&PeriodKey::for_period(RecordType::Income, period));
    let spending = account.bucket(&PeriodKey::for_period(RecordType::Expenditure, period));

    let mut expenditure_by_category = BTreeMap::new();
    for entry in spending {
        if let Some(category) = entry.category {
            let total = expenditure_by_category.entry(category).or_insert(Decimal::ZERO);
            *total = total.checked_add(entry.amount).ok_or_else(summary_overflow)?;
        }
    }

    let total_income = checked_total(income)?;
    let total_expenditure = checked_total(spending)?;
    let net = total_income
        .checked_sub(total_expenditure)
        .ok_or_else(summary_overflow)?;

    Ok(MonthSummary {
        period,
        total_income,
        total_expenditure,
        net,
        income_count: income.len(),
        expenditure_count: spending.len(),
        expenditure_by_category,
    })
}
