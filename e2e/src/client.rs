//! HTTP client that simulates how a chat UI talks to the proxy

use reqwest::Client;

use crate::types::ProxyResponse;

/// Build an HTTP client (no connection pooling for test isolation)
pub fn build_client() -> Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
}

/// Send a chat request to the proxy
pub async fn send_chat(
    client: &Client,
    proxy_addr: &str,
    request_body: serde_json::Value,
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}/api/chat");

    let resp = client
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&request_body)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request to proxy: {}", e))?;

    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read proxy response: {}", e))?;

    Ok(ProxyResponse { status, text })
}

/// Send a raw (possibly non-JSON) body to the proxy
pub async fn send_raw(
    client: &Client,
    proxy_addr: &str,
    body: &str,
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}/api/chat");

    let resp = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request to proxy: {}", e))?;

    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();

    Ok(ProxyResponse { status, text })
}

/// Send a request with an arbitrary method to the proxy chat endpoint
pub async fn send_with_method(
    client: &Client,
    proxy_addr: &str,
    method: reqwest::Method,
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}/api/chat");

    let resp = client
        .request(method, &url)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request to proxy: {}", e))?;

    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();

    Ok(ProxyResponse { status, text })
}
