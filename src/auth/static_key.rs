//! Long-lived API key strategy

use async_trait::async_trait;

use super::{AuthError, CredentialProvider, RequestCredentials};
use crate::config::AuthConfig;

/// Serves a single secret key from configuration, re-checked on every request
/// so a missing key fails that request (HTTP 500) without touching the network.
pub struct StaticKeyProvider {
    key: Option<String>,
    source: String,
}

impl StaticKeyProvider {
    /// Resolve the key from the loaded configuration: an inline value wins,
    /// otherwise the named environment variable is consulted.
    pub fn from_config(auth: &AuthConfig) -> Self {
        match auth.api_key.clone() {
            Some(key) => Self {
                key: Some(key),
                source: "config".to_string(),
            },
            None => Self {
                key: std::env::var(&auth.api_key_env).ok().filter(|k| !k.is_empty()),
                source: auth.api_key_env.clone(),
            },
        }
    }

    #[cfg(test)]
    pub fn with_key(key: Option<&str>) -> Self {
        Self {
            key: key.map(str::to_string),
            source: "test".to_string(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticKeyProvider {
    async fn resolve(&self) -> Result<RequestCredentials, AuthError> {
        match &self.key {
            Some(key) => Ok(RequestCredentials::QueryKey(key.clone())),
            None => Err(AuthError::MissingKey(format!(
                "API key is not configured (checked {})",
                self.source
            ))),
        }
    }

    fn strategy(&self) -> &'static str {
        "api_key"
    }
}
