//! Metrics collection from upstream responses

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::UsageMetadata;

/// Collected metrics from one request/response cycle.
///
/// Parsed from a copy of the upstream body for logging only; the relayed
/// response is never touched.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMetrics {
    /// Unique request ID
    pub request_id: String,
    /// Timestamp of the request
    pub timestamp: DateTime<Utc>,
    /// Model name
    pub model: String,
    /// Caller-supplied history length
    pub history_turns: usize,
    /// Prompt tokens (persona prefix included)
    pub prompt_tokens: u32,
    /// Tokens across returned candidates
    pub candidates_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
    /// Request duration in ms
    pub duration_ms: f64,
}

impl RequestMetrics {
    /// Extract metrics from a successful upstream response body.
    ///
    /// A body without `usageMetadata` still produces a metrics record with
    /// zeroed token counts.
    pub fn from_response(
        body: &[u8],
        model: &str,
        history_turns: usize,
        duration_ms: f64,
    ) -> Self {
        let usage = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("usageMetadata").cloned())
            .and_then(|u| serde_json::from_value::<UsageMetadata>(u).ok())
            .unwrap_or_default();

        Self {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            model: model.to_string(),
            history_turns,
            prompt_tokens: usage.prompt_token_count,
            candidates_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
            duration_ms,
        }
    }
}
