//! # Account Repository
//!
//! Maps the `users/{uid}` document to the domain [`Account`] and back.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "email": "ada@example.com",
//!   "name": "Ada",
//!   "balance": "10250.25",
//!   "entries": {
//!     "04-2025_income": [ { "amount": "250.25", "recordType": "income", ... } ]
//!   },
//!   "lastLoginAt": "2025-04-02T08:00:00Z"
//! }
//! ```
//!
//! Amounts are written as decimal strings so no precision is lost in the
//! JSON round trip.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::debug;

use crate::backend::domain::errors::DomainResult;
use crate::backend::domain::models::Account;
use crate::backend::storage::traits::DocumentStore;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn DocumentStore>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write a fresh account document, replacing any previous one
    pub async fn create(&self, uid: &str, account: &Account) -> Result<()> {
        debug!("Writing account document for {}", uid);
        let document = serde_json::to_value(account)?;
        self.store.set(USERS_COLLECTION, uid, &document).await
    }

    pub async fn get(&self, uid: &str) -> Result<Option<Account>> {
        match self.store.get(USERS_COLLECTION, uid).await? {
            Some(document) => {
                let account = serde_json::from_value(document)
                    .with_context(|| format!("account document {} is malformed", uid))?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    pub async fn exists(&self, uid: &str) -> Result<bool> {
        Ok(self.store.get(USERS_COLLECTION, uid).await?.is_some())
    }

    /// Apply `change` to the stored account as one transactional update.
    ///
    /// `change` may run several times when other writers race on the same
    /// account. A `DomainError` returned by it aborts the update and comes
    /// back unchanged inside the `anyhow` error. Returns `None` when the
    /// account does not exist.
    pub async fn modify<F>(&self, uid: &str, change: F) -> Result<Option<Account>>
    where
        F: Fn(Account) -> DomainResult<Account> + Send + Sync + 'static,
    {
        let document_id = uid.to_string();
        let updated = self
            .store
            .update_with(
                USERS_COLLECTION,
                uid,
                Box::new(move |document| {
                    let account: Account = serde_json::from_value(document).with_context(|| {
                        format!("account document {} is malformed", document_id)
                    })?;
                    let account = change(account)?;
                    Ok(serde_json::to_value(&account)?)
                }),
            )
            .await?;

        match updated {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Partial update of `lastLoginAt`. Returns false when the account is absent.
    pub async fn touch_last_login(&self, uid: &str, at: DateTime<Utc>) -> Result<bool> {
        let mut fields = Map::new();
        fields.insert("lastLoginAt".to_string(), json!(at));
        self.store.update(USERS_COLLECTION, uid, &fields).await
    }
}
