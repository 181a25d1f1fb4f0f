use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::backend::domain::models::entry::Entry;
use crate::backend::domain::period_key::PeriodKey;

/// Balance every account starts with
pub const INITIAL_BALANCE: Decimal = dec!(10000);

fn initial_balance() -> Decimal {
    INITIAL_BALANCE
}

/// Persisted state of a user: profile fields plus the ledger.
///
/// `balance` is a cached aggregate of `entries`; it only ever changes
/// together with an entry append (see `ledger::apply_entry`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    // Documents written before the ledger existed carry only email and name.
    #[serde(default = "initial_balance")]
    pub balance: Decimal,
    #[serde(default)]
    pub entries: BTreeMap<PeriodKey, Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            balance: INITIAL_BALANCE,
            entries: BTreeMap::new(),
            last_login_at: None,
        }
    }

    /// Entries of one bucket in recording order; empty when the bucket is absent
    pub fn bucket(&self, key: &PeriodKey) -> &[Entry] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_account_starts_with_initial_balance() {
        let account = Account::new("ada@example.com", "Ada");
        assert_eq!(account.balance, dec!(10000));
        assert_eq!(account.entry_count(), 0);
    }

    #[test]
    fn legacy_document_without_ledger_loads_with_defaults() {
        let account: Account =
            serde_json::from_value(json!({ "email": "ada@example.com", "name": "Ada" })).unwrap();
        assert_eq!(account.balance, INITIAL_BALANCE);
        assert!(account.entries.is_empty());
        assert!(account.last_login_at.is_none());
    }

    #[test]
    fn missing_bucket_reads_as_empty() {
        let account = Account::new("ada@example.com", "Ada");
        let key = PeriodKey::derive(crate::backend::domain::models::entry::RecordType::Income, 1, 2025)
            .unwrap();
        assert!(account.bucket(&key).is_empty());
    }
}
