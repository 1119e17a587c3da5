//! Shared types for the e2e test framework

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A mock response the upstream will serve for the next generateContent call
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl MockResponse {
    /// Create a standard JSON generateContent response
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }

    /// Create an error response
    pub fn error(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }
}

/// Shared state for the mock upstream server
#[derive(Debug, Default)]
pub struct UpstreamState {
    /// Queue of responses to serve - tests push responses, the mock pops and serves them
    pub response_queue: VecDeque<MockResponse>,
    /// All requests received by the mock (for inspection)
    pub received_requests: Vec<ReceivedRequest>,
}

/// A request received by the mock upstream
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: serde_json::Value,
}

pub type SharedUpstreamState = Arc<Mutex<UpstreamState>>;

/// Result of a proxy request
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: u16,
    /// Raw body text, kept for byte-for-byte relay assertions
    pub text: String,
}

impl ProxyResponse {
    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        serde_json::from_str(&self.text).map_err(|e| {
            anyhow::anyhow!(
                "Proxy response is not valid JSON: {}: {}",
                e,
                &self.text[..self.text.len().min(500)]
            )
        })
    }

    /// Get a nested field using dot notation (e.g. "candidates.0.content.parts.0.text")
    pub fn get(&self, path: &str) -> Option<serde_json::Value> {
        let mut current = self.json().ok()?;
        for part in path.split('.') {
            current = if let Ok(idx) = part.parse::<usize>() {
                current.as_array()?.get(idx)?.clone()
            } else {
                current.as_object()?.get(part)?.clone()
            };
        }
        Some(current)
    }
}

/// Result of a single test case
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    #[allow(dead_code)]
    pub error: Option<String>,
    pub duration_ms: u64,
}
