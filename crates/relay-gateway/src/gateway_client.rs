//! Gateway request shaping and response classification.
//!
//! Each call issues exactly one request. Any 2xx status is a success; every
//! other status and every transport fault is returned as a `GatewayError`
//! carrying the diagnostic text the dispatcher embeds in outcome lines.

use std::sync::Arc;

use anyhow::Result;
use reqwest::Method;
use serde_json::{json, Value};
use thiserror::Error;

use crate::gateway_config::GatewayConfig;
use crate::gateway_media::MediaKind;
use crate::gateway_transport::{
    GatewayRequest, GatewayResponse, GatewayTransport, ReqwestGatewayTransport,
};

const ROUTE_SEND_TEXT: &str = "message/sendText";
const ROUTE_SEND_MEDIA: &str = "message/sendMedia";
const ROUTE_CONNECTION_STATE: &str = "instance/connectionState";
const HEADER_API_KEY: &str = "apikey";
const HEADER_CONTENT_TYPE: &str = "Content-Type";
const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure of a single gateway exchange.
pub enum GatewayError {
    #[error("gateway returned non-success status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("gateway transport error: {detail}")]
    Transport { detail: String },
    #[error("gateway returned status {status} with a body that is not JSON: {detail}")]
    MalformedBody { status: u16, detail: String },
}

#[derive(Debug, Clone, PartialEq)]
/// Successful gateway reply.
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    /// Parses the body as JSON, yielding `Value::Null` when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str::<Value>(&self.body).unwrap_or(Value::Null)
    }

    /// Parses the body as JSON, reporting a body that is not JSON as an error.
    pub fn try_json(&self) -> Result<Value, GatewayError> {
        serde_json::from_str::<Value>(&self.body).map_err(|error| GatewayError::MalformedBody {
            status: self.status,
            detail: error.to_string(),
        })
    }
}

#[derive(Clone)]
/// Issues send-text, send-media, and connection-state requests.
pub struct GatewayClient {
    config: GatewayConfig,
    transport: Arc<dyn GatewayTransport>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.config.base_url)
            .field("default_instance", &self.config.default_instance)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let transport = ReqwestGatewayTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn GatewayTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn resolve_instance(&self, instance: Option<&str>) -> String {
        self.config.resolve_instance(instance)
    }

    pub async fn send_text(
        &self,
        instance: &str,
        recipient: &str,
        text: &str,
    ) -> Result<GatewayReply, GatewayError> {
        let request = self.post_request(
            ROUTE_SEND_TEXT,
            instance,
            json!({
                "number": recipient,
                "text": text,
            }),
        );
        self.execute(request).await
    }

    pub async fn send_media(
        &self,
        instance: &str,
        recipient: &str,
        media_url: &str,
        media_kind: MediaKind,
    ) -> Result<GatewayReply, GatewayError> {
        let request = self.post_request(
            ROUTE_SEND_MEDIA,
            instance,
            json!({
                "number": recipient,
                "mediatype": media_kind.as_str(),
                "media": media_url,
            }),
        );
        self.execute(request).await
    }

    pub async fn query_state(&self, instance: &str) -> Result<GatewayReply, GatewayError> {
        let request = GatewayRequest {
            method: Method::GET,
            endpoint: self.config.endpoint(ROUTE_CONNECTION_STATE, instance),
            headers: vec![(HEADER_API_KEY.to_string(), self.config.api_key.clone())],
            body: None,
        };
        self.execute(request).await
    }

    fn post_request(&self, route: &str, instance: &str, body: Value) -> GatewayRequest {
        GatewayRequest {
            method: Method::POST,
            endpoint: self.config.endpoint(route, instance),
            headers: vec![
                (
                    HEADER_CONTENT_TYPE.to_string(),
                    CONTENT_TYPE_JSON.to_string(),
                ),
                (HEADER_API_KEY.to_string(), self.config.api_key.clone()),
            ],
            body: Some(body),
        }
    }

    async fn execute(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError> {
        tracing::debug!(
            method = %request.method,
            endpoint = request.endpoint.as_str(),
            "gateway request"
        );
        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    endpoint = request.endpoint.as_str(),
                    error = %error,
                    "gateway transport failed"
                );
                return Err(GatewayError::Transport {
                    detail: error.to_string(),
                });
            }
        };
        classify_response(response)
    }
}

fn classify_response(response: GatewayResponse) -> Result<GatewayReply, GatewayError> {
    if response.is_success() {
        return Ok(GatewayReply {
            status: response.status,
            body: response.body,
        });
    }
    tracing::warn!(status = response.status, "gateway rejected request");
    Err(GatewayError::Rejected {
        status: response.status,
        body: response.body,
    })
}
