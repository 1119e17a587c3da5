//! Wire types shared between the inbound chat endpoint and the upstream call.
//!
//! The upstream response stays an opaque byte buffer on the relay path; only
//! `UsageMetadata` is parsed out of a copy for stats logging.

use serde::{Deserialize, Serialize};

/// One conversation turn, attributed to `"user"` or `"model"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    /// Text-only turn with the given role.
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Text fragment within a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

/// Inbound request body: the caller-supplied conversation history.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub history: Vec<Content>,
}

/// Upstream request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Token accounting attached to upstream responses.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}
