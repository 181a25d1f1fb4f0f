//! Test doubles for the external collaborators plus a ready-made
//! environment backed by an in-memory document store.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::backend::domain::models::ChatMessage;
use crate::backend::providers::{ChatModel, IdentityProvider, IdentityUser, ProviderError, SignIn};
use crate::backend::storage::{DbConnection, DocumentStore, SqliteDocumentStore};

struct FakeUser {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// In-memory identity provider keyed by email
#[derive(Default)]
pub struct FakeIdentityProvider {
    users: Mutex<HashMap<String, FakeUser>>,
}

impl FakeIdentityProvider {
    fn find_by_uid(&self, uid: &str) -> Option<IdentityUser> {
        let users = self.users.lock().unwrap();
        let found = users.iter().find(|(_, u)| u.uid == uid).map(|(email, u)| IdentityUser {
            uid: u.uid.clone(),
            email: email.clone(),
            display_name: u.display_name.clone(),
        });
        found
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(ProviderError::Rejected("EMAIL_EXISTS".to_string()));
        }
        let uid = format!("uid-{}", users.len() + 1);
        users.insert(
            email.to_string(),
            FakeUser {
                uid: uid.clone(),
                password: password.to_string(),
                display_name: display_name.map(str::to_string),
            },
        );
        Ok(uid)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<SignIn, ProviderError> {
        let users = self.users.lock().unwrap();
        match users.get(email) {
            Some(user) if user.password == password => Ok(SignIn {
                uid: user.uid.clone(),
                email: email.to_string(),
                display_name: user.display_name.clone(),
                id_token: format!("id-token-{}", user.uid),
                refresh_token: format!("refresh-token-{}", user.uid),
                expires_in: "3600".to_string(),
            }),
            _ => Err(ProviderError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string())),
        }
    }

    async fn lookup_user(&self, uid: &str) -> Result<IdentityUser, ProviderError> {
        self.find_by_uid(uid)
            .ok_or_else(|| ProviderError::Rejected("USER_NOT_FOUND".to_string()))
    }
}

/// Chat model that answers with queued replies and records every transcript
#[derive(Default)]
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<String>>,
    transcripts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChatModel {
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    /// Transcripts received so far, oldest first
    pub fn transcripts(&self) -> Vec<Vec<ChatMessage>> {
        self.transcripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, _model_id: &str, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.transcripts.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::UnexpectedResponse("no scripted reply left".to_string()))
    }
}

/// Collaborators wired the way the services expect them
pub struct TestEnvironment {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<FakeIdentityProvider>,
    pub chat_model: Arc<ScriptedChatModel>,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let db = DbConnection::in_memory()
            .await
            .expect("Failed to init test DB");
        Self {
            store: Arc::new(SqliteDocumentStore::new(db)),
            identity: Arc::new(FakeIdentityProvider::default()),
            chat_model: Arc::new(ScriptedChatModel::default()),
        }
    }
}
