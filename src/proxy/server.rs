//! Main proxy server implementation

use axum::{
    extract::State,
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::ChatProxyHandler;
use crate::auth::CredentialProvider;
use crate::config::AppConfig;
use crate::persona::PersonaProfile;

/// Shared state for the proxy
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
    pub credentials: Arc<dyn CredentialProvider>,
    pub persona: Arc<PersonaProfile>,
}

/// Build the HTTP client used for upstream calls
fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_seconds))
        .pool_max_idle_per_host(10)
        .build()
}

/// Build the router over the given state
pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Chat endpoint takes any method; the handler enforces POST itself
        // so the 405 contract (empty body, no upstream call) stays in one place
        .route("/api/chat", any(chat_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the proxy server
pub async fn run_server(
    config: AppConfig,
    persona: PersonaProfile,
    credentials: Arc<dyn CredentialProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let http_client = build_http_client(&config)?;

    let state = ProxyState {
        config: Arc::new(config.clone()),
        http_client,
        credentials,
        persona: Arc::new(persona),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("pantry-proxy listening on {}", addr);
    tracing::info!(
        "Proxying to {} (model {})",
        config.upstream.base_url(),
        config.upstream.model
    );

    Ok(axum::serve(listener, app).await?)
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Chat proxy handler for all methods on /api/chat
async fn chat_handler(
    State(state): State<ProxyState>,
    req: axum::extract::Request,
) -> axum::response::Response {
    let handler = ChatProxyHandler::new(state);
    handler.handle(req).await
}
