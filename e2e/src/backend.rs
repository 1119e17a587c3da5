//! Mock upstream server that simulates the generative-language API
//!
//! Tests pre-configure responses via SharedUpstreamState before each request.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::types::{MockResponse, ReceivedRequest, SharedUpstreamState, UpstreamState};

/// Default fallback response when no response is queued
fn default_generate_response() -> MockResponse {
    MockResponse::json(
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Default response (no mock queued)"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":5,"totalTokenCount":15}}"#,
    )
}

/// Handle any request under /v1beta/models/ - serves pre-configured mock responses
async fn handle_generate(
    State(state): State<SharedUpstreamState>,
    request: Request<Body>,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let body_bytes = axum::body::to_bytes(request.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap_or_default();
    let body_json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    let received = ReceivedRequest {
        method,
        path,
        query,
        body: body_json,
    };

    // Pop the next configured response (or use default)
    let mock_response = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(received);
        state.response_queue.pop_front().unwrap_or_else(default_generate_response)
    };

    Response::builder()
        .status(mock_response.status)
        .header("Content-Type", &mock_response.content_type)
        .body(Body::from(mock_response.body))
        .unwrap()
        .into_response()
}

/// Unmatched paths get a 404 so misrouted proxy requests show up loudly
async fn handle_fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, r#"{"error":{"message":"unknown mock path"}}"#)
}

/// Start the mock upstream server and return the shared state handle
pub async fn start(port: u16) -> anyhow::Result<SharedUpstreamState> {
    let state: SharedUpstreamState =
        std::sync::Arc::new(std::sync::Mutex::new(UpstreamState::default()));

    let app = Router::new()
        .route("/v1beta/models/*rest", any(handle_generate))
        .fallback(handle_fallback)
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind mock upstream to {}: {}", addr, e))?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream server failed");
    });

    // Brief pause to let the server start accepting connections
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    Ok(state)
}

/// Helper to configure the next response for generateContent
pub fn queue_response(state: &SharedUpstreamState, response: MockResponse) {
    state.lock().unwrap().response_queue.push_back(response);
}

/// Helper to get all requests received since last clear
pub fn drain_requests(state: &SharedUpstreamState) -> Vec<ReceivedRequest> {
    let mut s = state.lock().unwrap();
    s.received_requests.drain(..).collect()
}
