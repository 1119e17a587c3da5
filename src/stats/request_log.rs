//! Compact one-line log of each inbound chat request

use crate::api::ChatRequest;

/// Format a request log message in compact format
pub fn format_request_log(request: &ChatRequest) -> String {
    let mut parts = vec![format!("turns={}", request.history.len())];

    if let Some(msg) = extract_first_user_message(request) {
        parts.push(format!("\"{}\"", msg));
    }

    format!("→ {}", parts.join(" "))
}

/// Extract and format the first user turn's text with truncation
fn extract_first_user_message(request: &ChatRequest) -> Option<String> {
    for turn in &request.history {
        if turn.role.as_deref() != Some("user") {
            continue;
        }
        let text = turn
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }
        return Some(truncate_message(&normalize_whitespace(&text)));
    }

    None
}

/// Convert newlines and tabs to single spaces, collapse multiple spaces
fn normalize_whitespace(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate message according to rules:
/// - If <= 100 chars: show all
/// - If > 100 chars: first 25 + " ... " + last 75
fn truncate_message(s: &str) -> String {
    const MAX_TOTAL: usize = 100;
    const PREFIX_LEN: usize = 25;
    const SUFFIX_LEN: usize = 75;
    const ELLIPSIS: &str = " ... ";

    if s.len() <= MAX_TOTAL {
        return s.to_string();
    }

    let prefix = &s[..PREFIX_LEN.min(s.len())];
    let suffix_start = s.len().saturating_sub(SUFFIX_LEN);
    let suffix = &s[suffix_start..];

    format!("{}{}{}", prefix, ELLIPSIS, suffix)
}
