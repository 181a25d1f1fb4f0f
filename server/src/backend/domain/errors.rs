//! Error taxonomy shared by every domain service.

use crate::backend::providers::ProviderError;

/// Errors surfaced by domain operations.
///
/// Every variant maps to a client-visible error payload; none of them is
/// fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Missing or malformed input, unknown enum token, bad amount
    #[error("{0}")]
    InvalidArgument(String),
    /// Referenced account or goal does not exist
    #[error("{0}")]
    NotFound(String),
    /// The identity provider rejected the credentials or the request
    #[error("{0}")]
    Authentication(String),
    /// A collaborator (store, identity provider, language model) failed or
    /// answered with an unexpected shape
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        DomainError::UpstreamFailure(message.into())
    }
}

/// Storage adapters report failures through `anyhow`. A `DomainError` raised
/// inside a transactional mutation travels through the store wrapped in
/// `anyhow` and is recovered here unchanged.
impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain,
            Err(other) => DomainError::UpstreamFailure(format!("{:#}", other)),
        }
    }
}

impl From<ProviderError> for DomainError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(message) => DomainError::Authentication(message),
            other => DomainError::UpstreamFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_survives_anyhow_round_trip() {
        let wrapped = anyhow::Error::from(DomainError::invalid("amount is too large"));
        match DomainError::from(wrapped) {
            DomainError::InvalidArgument(message) => assert_eq!(message, "amount is too large"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn foreign_anyhow_error_becomes_upstream_failure() {
        let err = DomainError::from(anyhow::anyhow!("disk I/O error"));
        assert!(matches!(err, DomainError::UpstreamFailure(ref m) if m.contains("disk I/O error")));
    }

    #[test]
    fn rejected_provider_call_is_an_authentication_error() {
        let err = DomainError::from(ProviderError::Rejected("INVALID_PASSWORD".to_string()));
        assert!(matches!(err, DomainError::Authentication(_)));
    }
}
