//! Identity provider client.
//!
//! Talks to the identity-toolkit REST API (`accounts:signUp`,
//! `accounts:signInWithPassword`, `accounts:lookup`). Only the calls the
//! account service needs are implemented; tokens are passed through to the
//! client untouched.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, REQUEST_TIMEOUT};

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Tokens issued on a successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct SignIn {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its uid
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<String, ProviderError>;

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<SignIn, ProviderError>;

    async fn lookup_user(&self, uid: &str) -> Result<IdentityUser, ProviderError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    local_id: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest client for the identity-toolkit REST API
#[derive(Clone)]
pub struct IdentityToolkitClient {
    client: Client,
    base_url: String,
    api_key: String,
    admin_token: Option<String>,
}

impl IdentityToolkitClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        admin_token: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            admin_token,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.base_url, method)
    }

    async fn post<B, R>(&self, method: &str, body: &B, authorize: bool) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!("identity provider call accounts:{}", method);
        let mut request = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body);
        if authorize {
            if let Some(token) = &self.admin_token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        decode(response).await
    }
}

/// Decode a success body, or turn the provider's error envelope into
/// `ProviderError::Rejected`
async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ProviderError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&text)
            .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()));
    }

    match serde_json::from_str::<ErrorEnvelope>(&text) {
        Ok(envelope) if status.is_client_error() => Err(ProviderError::Rejected(envelope.error.message)),
        Ok(envelope) => Err(ProviderError::UnexpectedResponse(format!(
            "{}: {}",
            status, envelope.error.message
        ))),
        Err(_) => Err(ProviderError::UnexpectedResponse(format!("{}: {}", status, text))),
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<String, ProviderError> {
        let response: SignUpResponse = self
            .post(
                "signUp",
                &SignUpRequest {
                    email,
                    password,
                    display_name,
                    return_secure_token: true,
                },
                false,
            )
            .await?;
        Ok(response.local_id)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<SignIn, ProviderError> {
        let response: SignInResponse = self
            .post(
                "signInWithPassword",
                &SignInRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
                false,
            )
            .await?;

        Ok(SignIn {
            uid: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
        })
    }

    async fn lookup_user(&self, uid: &str) -> Result<IdentityUser, ProviderError> {
        let response: LookupResponse = self
            .post("lookup", &LookupRequest { local_id: [uid] }, true)
            .await?;

        response
            .users
            .into_iter()
            .find(|user| user.local_id == uid)
            .map(|user| IdentityUser {
                uid: user.local_id,
                email: user.email,
                display_name: user.display_name.filter(|n| !n.is_empty()),
            })
            .ok_or_else(|| ProviderError::Rejected("USER_NOT_FOUND".to_string()))
    }
}
