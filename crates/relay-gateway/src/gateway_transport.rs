//! HTTP transport seam for gateway requests.
//!
//! The gateway client shapes requests and classifies responses; the transport
//! only performs the exchange. `ReqwestGatewayTransport` is the production
//! implementation, tests substitute in-memory transports.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
/// One outbound gateway request.
pub struct GatewayRequest {
    pub method: Method,
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw status and body returned by the gateway.
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single request/response exchange.
///
/// Implementations return `Err` only when no HTTP response was obtained;
/// every received status, including 4xx/5xx, is an `Ok` response.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn send(&self, request: &GatewayRequest) -> Result<GatewayResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestGatewayTransport {
    client: reqwest::Client,
}

impl ReqwestGatewayTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build gateway http client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTransport for ReqwestGatewayTransport {
    async fn send(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        let mut http_request = self
            .client
            .request(request.method.clone(), request.endpoint.as_str());
        for (header, value) in &request.headers {
            http_request = http_request.header(header, value);
        }
        if let Some(body) = &request.body {
            http_request = http_request.json(body);
        }
        let response = http_request.send().await?;
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(
                    endpoint = request.endpoint.as_str(),
                    status,
                    error = %error,
                    "failed to read gateway response body"
                );
                format!("<failed to read response body: {error}>")
            }
        };
        Ok(GatewayResponse { status, body })
    }
}
