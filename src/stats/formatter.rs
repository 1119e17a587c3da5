//! Stats formatting for different output formats

use super::RequestMetrics;
use crate::config::StatsFormat;

/// Format metrics according to the configured format
pub fn format_metrics(metrics: &RequestMetrics, format: StatsFormat) -> String {
    match format {
        StatsFormat::Pretty => format_pretty(metrics),
        StatsFormat::Json => format_json(metrics),
        StatsFormat::Compact => format_compact(metrics),
    }
}

/// Pretty box format for terminal output
fn format_pretty(m: &RequestMetrics) -> String {
    format!(
        r#"┌──────────────────────────────────────────────────────────────────┐
│ Chat Request Metrics                                             │
├──────────────────────────────────────────────────────────────────┤
│ Model: {:56}│
│ Time:  {:56}│
├──────────────────────────────────────────────────────────────────┤
│ Tokens                                                           │
│   Prompt: {:6} │ Candidates: {:6} │ Total: {:6}             │
├──────────────────────────────────────────────────────────────────┤
│ History turns: {:48}│
│ Duration: {:51.1}ms │
└──────────────────────────────────────────────────────────────────┘
"#,
        truncate(&m.model, 56),
        m.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        m.prompt_tokens,
        m.candidates_tokens,
        m.total_tokens,
        m.history_turns,
        m.duration_ms,
    )
}

/// Single-line JSON for log aggregation
fn format_json(m: &RequestMetrics) -> String {
    serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string())
}

/// Compact single-line format
fn format_compact(m: &RequestMetrics) -> String {
    format!(
        "← model={} turns={} tokens={}+{}={} {:.0}ms",
        m.model, m.history_turns, m.prompt_tokens, m.candidates_tokens, m.total_tokens, m.duration_ms
    )
}

/// Truncate a string to fit the pretty box
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RequestMetrics {
        RequestMetrics::from_response(
            br#"{"usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":20,"totalTokenCount":30}}"#,
            "gemini-test",
            2,
            123.4,
        )
    }

    #[test]
    fn test_format_compact() {
        let out = format_metrics(&sample(), StatsFormat::Compact);
        assert!(out.contains("model=gemini-test"));
        assert!(out.contains("turns=2"));
        assert!(out.contains("tokens=10+20=30"));
    }

    #[test]
    fn test_format_json_is_valid_json() {
        let out = format_metrics(&sample(), StatsFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["total_tokens"], 30);
        assert_eq!(parsed["model"], "gemini-test");
    }

    #[test]
    fn test_format_pretty_mentions_model() {
        let out = format_metrics(&sample(), StatsFormat::Pretty);
        assert!(out.contains("gemini-test"));
        assert!(out.contains("Tokens"));
    }
}
