//! Proxy error taxonomy and HTTP response mapping

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;

/// Failures surfaced by the chat proxy handler.
///
/// Every variant maps to a single HTTP response. Upstream errors relay the
/// provider's own status code and body; everything else gets a small JSON
/// body with a `message` field. Method errors carry an empty body.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream authentication failed: {0}")]
    UpstreamAuth(String),

    #[error("upstream returned status {status}")]
    Upstream { status: StatusCode, body: Vec<u8> },

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
}

impl ProxyError {
    /// Status code this error maps to on the inbound side.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::UpstreamAuth(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AuthError> for ProxyError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingKey(msg) | AuthError::InvalidCredentials(msg) => {
                ProxyError::Configuration(msg)
            }
            AuthError::Exchange(msg) => ProxyError::UpstreamAuth(msg),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::UpstreamTimeout
        } else {
            ProxyError::UpstreamUnreachable(err.to_string())
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            // Wrong method gets an empty body per the inbound contract
            ProxyError::MethodNotAllowed => {
                Response::builder().status(status).body(Body::empty()).unwrap().into_response()
            }
            // Upstream error bodies relay unchanged so the caller sees the
            // provider's own diagnostic
            ProxyError::Upstream { body, .. } => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
                .into_response(),
            other => {
                let body = serde_json::json!({ "message": other.to_string() });
                Response::builder()
                    .status(status)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
                    .into_response()
            }
        }
    }
}
