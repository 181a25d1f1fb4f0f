//! # Providers
//!
//! External collaborators the domain depends on but does not own: the
//! identity provider and the language model. Each sits behind a trait so
//! services can be exercised against fakes.

pub mod chat_model;
pub mod identity;

pub use chat_model::{ChatModel, OpenAiChatClient};
pub use identity::{IdentityProvider, IdentityToolkitClient, IdentityUser, SignIn};

use std::time::Duration;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure talking to an external provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider understood the request and refused it
    /// (bad credentials, duplicate email, unknown user)
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
