//! Credential acquisition for the upstream API.
//!
//! Two mutually exclusive strategies, selected by configuration at startup:
//! a static API key sent in the query string, or a service-account credential
//! exchanged for a short-lived bearer token. The handler is identical either
//! way; it only sees the `CredentialProvider` capability.

mod delegated;
mod static_key;

use async_trait::async_trait;
use std::sync::Arc;

pub use delegated::{DelegatedTokenProvider, ServiceAccountKey};
pub use static_key::StaticKeyProvider;

use crate::config::{AuthConfig, AuthMode};

/// Credential material attached to a single upstream request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestCredentials {
    /// API key passed as the `key` query-string parameter
    QueryKey(String),
    /// Short-lived bearer token in the Authorization header
    Bearer(String),
}

impl RequestCredentials {
    /// Attach these credentials to an outgoing request.
    pub fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            RequestCredentials::QueryKey(key) => req.query(&[("key", key.as_str())]),
            RequestCredentials::Bearer(token) => req.bearer_auth(token),
        }
    }
}

/// Credential acquisition failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Required key absent from configuration; no network call was made
    #[error("{0}")]
    MissingKey(String),

    /// Credential material present but unreadable/unparseable
    #[error("{0}")]
    InvalidCredentials(String),

    /// The token exchange with the identity provider failed
    #[error("{0}")]
    Exchange(String),
}

/// Per-request credential resolution.
///
/// Implementations must be cheap to call on every request; any caching
/// (e.g. of exchanged tokens) is the provider's own concern.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn resolve(&self) -> Result<RequestCredentials, AuthError>;

    /// Human-readable strategy name for logs and `check-config`
    fn strategy(&self) -> &'static str;
}

/// Build the provider selected by the deployment's auth configuration.
pub fn provider_from_config(auth: &AuthConfig) -> Arc<dyn CredentialProvider> {
    match auth.mode {
        AuthMode::ApiKey => Arc::new(StaticKeyProvider::from_config(auth)),
        AuthMode::ServiceAccount => Arc::new(DelegatedTokenProvider::from_config(auth)),
    }
}
