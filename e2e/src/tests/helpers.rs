//! Common test helpers and JSON builders

use serde_json::{json, Value};

// ─── Request builders ────────────────────────────────────────────────────────

/// Build a chat request with a single user turn
pub fn basic_history(prompt: &str) -> Value {
    json!({
        "history": [
            {"role": "user", "parts": [{"text": prompt}]}
        ]
    })
}

/// Build a chat request with a longer alternating history
pub fn multi_turn_history() -> Value {
    json!({
        "history": [
            {"role": "user", "parts": [{"text": "How do I start my business?"}]},
            {"role": "model", "parts": [{"text": "What specific type of food product are you making?"}]},
            {"role": "user", "parts": [{"text": "Small-batch hot sauce"}]}
        ]
    })
}

// ─── Response builders ───────────────────────────────────────────────────────

/// Build a normal generateContent response from the "upstream"
pub fn upstream_text_response(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": text}]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 420,
            "candidatesTokenCount": 31,
            "totalTokenCount": 451
        }
    })
    .to_string()
}

// ─── Assertion helpers ───────────────────────────────────────────────────────

pub fn assert_true(cond: bool, msg: &str) -> anyhow::Result<()> {
    if cond {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{}", msg))
    }
}

pub fn assert_eq_str(actual: &str, expected: &str, what: &str) -> anyhow::Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} mismatch: expected {:?}, got {:?}",
            what,
            expected,
            actual
        ))
    }
}
