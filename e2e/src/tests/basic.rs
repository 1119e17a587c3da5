//! Basic proxy behavior tests - persona injection, verbatim relay, credentials

use crate::backend::{drain_requests, queue_response};
use crate::client::send_chat;
use crate::runner::TestContext;
use crate::types::MockResponse;

use super::helpers::*;

/// Successful chat round trip - the upstream body is relayed byte-for-byte
pub async fn test_success_relays_body_verbatim(ctx: TestContext) -> anyhow::Result<()> {
    let upstream_body = upstream_text_response("What city are you operating in?");
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_body.clone()));

    let resp = send_chat(&ctx.http_client, &ctx.proxy_addr, basic_history("How do I start?")).await?;

    assert_true(resp.status == 200, &format!("Expected 200, got {}", resp.status))?;
    assert_eq_str(&resp.text, &upstream_body, "relayed body")?;

    let text = resp
        .get("candidates.0.content.parts.0.text")
        .ok_or_else(|| anyhow::anyhow!("Missing candidates[0].content.parts[0].text"))?;
    assert_true(
        text == "What city are you operating in?",
        "candidate text survived the relay",
    )?;

    Ok(())
}

/// The upstream payload starts with the two persona turns, history after, order kept
pub async fn test_payload_carries_persona_prefix(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_text_response("ok")));

    send_chat(&ctx.http_client, &ctx.proxy_addr, multi_turn_history()).await?;

    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(reqs.len() == 1, &format!("Expected 1 upstream request, got {}", reqs.len()))?;

    let contents = reqs[0]
        .body
        .get("contents")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow::anyhow!("Upstream payload has no contents array"))?;

    assert_true(
        contents.len() == 5,
        &format!("Expected 2 persona turns + 3 history turns, got {}", contents.len()),
    )?;

    let persona_text = contents[0]["parts"][0]["text"].as_str().unwrap_or_default();
    assert_true(contents[0]["role"] == "user", "Persona turn must be a user turn")?;
    assert_true(
        persona_text.contains("Pantry Pal"),
        "Persona turn must carry the system prompt",
    )?;
    assert_true(contents[1]["role"] == "model", "Second turn must be the model acknowledgment")?;

    let ack_text = contents[1]["parts"][0]["text"].as_str().unwrap_or_default();
    assert_true(ack_text.starts_with("Understood."), "Acknowledgment turn is scripted")?;

    // Caller history follows unchanged, in order
    assert_true(
        contents[2]["parts"][0]["text"] == "How do I start my business?",
        "First history turn out of place",
    )?;
    assert_true(
        contents[3]["role"] == "model",
        "Second history turn must keep its model role",
    )?;
    assert_true(
        contents[4]["parts"][0]["text"] == "Small-batch hot sauce",
        "Last history turn out of place",
    )?;

    Ok(())
}

/// The configured API key travels as the key query-string parameter
pub async fn test_api_key_sent_in_query_string(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_text_response("ok")));

    send_chat(&ctx.http_client, &ctx.proxy_addr, basic_history("hi")).await?;

    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(!reqs.is_empty(), "Upstream received no request")?;

    let query = reqs[0].query.clone().unwrap_or_default();
    assert_true(
        query.contains("key=e2e-test-key"),
        &format!("API key missing from query string: {:?}", query),
    )?;
    assert_true(
        reqs[0].path.ends_with(":generateContent"),
        &format!("Unexpected upstream path: {}", reqs[0].path),
    )?;

    Ok(())
}

/// An empty history is valid and yields just the persona prefix upstream
pub async fn test_empty_history_sends_prefix_only(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_text_response("ok")));

    let resp = send_chat(
        &ctx.http_client,
        &ctx.proxy_addr,
        serde_json::json!({"history": []}),
    )
    .await?;
    assert_true(resp.status == 200, &format!("Expected 200, got {}", resp.status))?;

    let reqs = drain_requests(&ctx.upstream_state);
    let contents = reqs[0]
        .body
        .get("contents")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow::anyhow!("Upstream payload has no contents array"))?;
    assert_true(
        contents.len() == 2,
        &format!("Expected exactly the 2 persona turns, got {}", contents.len()),
    )?;

    Ok(())
}
