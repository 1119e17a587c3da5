//! Request/response handler for the chat proxy

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use super::server::ProxyState;
use crate::api::{ChatRequest, Content, GenerateContentRequest};
use crate::auth::CredentialProvider;
use crate::error::ProxyError;
use crate::persona::PersonaProfile;
use crate::stats::{format_metrics, format_request_log, RequestMetrics};

/// Inbound bodies larger than this are rejected before parsing
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build the upstream payload: persona prefix first, caller history after,
/// ordering untouched.
pub fn build_payload(persona: &PersonaProfile, history: Vec<Content>) -> GenerateContentRequest {
    let mut contents = persona.conversation_prefix();
    contents.extend(history);
    GenerateContentRequest { contents }
}

/// Stateless chat proxy handler
pub struct ChatProxyHandler {
    state: ProxyState,
}

impl ChatProxyHandler {
    pub fn new(state: ProxyState) -> Self {
        Self { state }
    }

    /// Handle an incoming request
    pub async fn handle(&self, req: Request<Body>) -> Response {
        match self.try_handle(req).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    ProxyError::MethodNotAllowed => {
                        tracing::debug!("Rejected non-POST request");
                    }
                    ProxyError::Upstream { status, body } => {
                        tracing::error!(
                            status = %status,
                            error_body = %String::from_utf8_lossy(body),
                            "Upstream returned error response"
                        );
                    }
                    other => {
                        tracing::error!(error = %other, "Chat request failed");
                    }
                }
                err.into_response()
            }
        }
    }

    async fn try_handle(&self, req: Request<Body>) -> Result<Response, ProxyError> {
        if req.method() != Method::POST {
            return Err(ProxyError::MethodNotAllowed);
        }

        let body_bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| ProxyError::MalformedRequest(format!("Failed to read body: {}", e)))?;

        let chat: ChatRequest = serde_json::from_slice(&body_bytes)
            .map_err(|e| ProxyError::MalformedRequest(format!("Invalid request body: {}", e)))?;

        tracing::info!("{}", format_request_log(&chat));

        // Credentials come from process-wide configuration on every request;
        // failures here surface before the upstream call is attempted
        let credentials = self.state.credentials.resolve().await?;

        let history_turns = chat.history.len();
        let payload = build_payload(&self.state.persona, chat.history);

        let url = self.state.config.upstream.generate_url();
        tracing::debug!(url = %url, turns = history_turns, "Forwarding to upstream");

        let start = Instant::now();
        let upstream_response = credentials
            .apply(self.state.http_client.post(&url))
            .json(&payload)
            .send()
            .await?;

        let status = StatusCode::from_u16(upstream_response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let body = upstream_response.bytes().await?;
        let duration_ms = start.elapsed().as_millis() as f64;

        if !status.is_success() {
            // Relayed as-is so the caller sees the provider's own diagnostic
            return Err(ProxyError::Upstream {
                status,
                body: body.to_vec(),
            });
        }

        if self.state.config.stats.enabled {
            let metrics = RequestMetrics::from_response(
                &body,
                &self.state.config.upstream.model,
                history_turns,
                duration_ms,
            );
            tracing::info!("{}", format_metrics(&metrics, self.state.config.stats.format));
        }

        // Success body relays byte-for-byte
        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
            .into_response())
    }
}
