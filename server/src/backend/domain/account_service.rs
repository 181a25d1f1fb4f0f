//! Account lifecycle: registration, login and the profile view.
//!
//! Credentials are checked by the identity provider; this service only keeps
//! the account document (profile fields and ledger) in step with it.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::account::{LoginCommand, ProfileResult, RegisterCommand};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::ledger_service::account_not_found;
use crate::backend::domain::models::Account;
use crate::backend::providers::{IdentityProvider, SignIn};
use crate::backend::storage::{AccountRepository, DocumentStore};

#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    accounts: AccountRepository,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            accounts: AccountRepository::new(store),
        }
    }

    /// Create the identity and the account document; returns the new uid
    pub async fn register(&self, command: RegisterCommand) -> DomainResult<String> {
        info!("Registering account: {:?}", command);

        let email = command.email.trim();
        if email.is_empty() {
            return Err(DomainError::invalid("email is required"));
        }
        if command.password.is_empty() {
            return Err(DomainError::invalid("password is required"));
        }
        let name = command
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let uid = self
            .identity
            .create_account(email, &command.password, name)
            .await?;

        self.accounts
            .create(&uid, &Account::new(email, name.unwrap_or_default()))
            .await?;

        info!("Registered account {}", uid);
        Ok(uid)
    }

    pub async fn login(&self, command: LoginCommand) -> DomainResult<SignIn> {
        info!("Login attempt: {:?}", command);

        if command.email.trim().is_empty() || command.password.is_empty() {
            return Err(DomainError::invalid("email and password are required"));
        }

        let sign_in = self
            .identity
            .verify_credentials(command.email.trim(), &command.password)
            .await?;

        if !self.accounts.touch_last_login(&sign_in.uid, Utc::now()).await? {
            warn!("Identity {} signed in without an account document", sign_in.uid);
        }

        info!("Login successful for {}", sign_in.uid);
        Ok(sign_in)
    }

    pub async fn profile(&self, uid: &str) -> DomainResult<ProfileResult> {
        info!("Getting profile for {}", uid);

        let user = self.identity.lookup_user(uid).await?;
        let account = self
            .accounts
            .get(uid)
            .await?
            .ok_or_else(|| account_not_found(uid))?;

        let name = user
            .display_name
            .or_else(|| Some(account.name.clone()).filter(|n| !n.is_empty()));

        Ok(ProfileResult {
            uid: user.uid,
            email: user.email,
            name,
            balance: account.balance,
        })
    }
}
