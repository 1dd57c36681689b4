use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use relay_gateway::{GatewayConfig, GatewayRequest, GatewayResponse, GatewayTransport};

use crate::progress::DispatchProgressSink;

pub(crate) fn test_config() -> GatewayConfig {
    GatewayConfig {
        base_url: "https://gateway.test".to_string(),
        api_key: "test-key".to_string(),
        default_instance: "primary".to_string(),
    }
}

/// Records every request and answers per recipient number.
///
/// Numbers listed in `responses` get that status/body (a `None` status means
/// a transport failure); everything else gets `200 {}`. Bodiless requests
/// such as state queries are keyed by the empty string.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    pub(crate) responses: BTreeMap<String, (Option<u16>, String)>,
    pub(crate) requests: Mutex<Vec<GatewayRequest>>,
}

impl RecordingTransport {
    pub(crate) fn respond(mut self, number: &str, status: Option<u16>, body: &str) -> Self {
        self.responses
            .insert(number.to_string(), (status, body.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl GatewayTransport for RecordingTransport {
    async fn send(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let number = request
            .body
            .as_ref()
            .and_then(|body| body.get("number"))
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        match self.responses.get(number) {
            Some((Some(status), body)) => Ok(GatewayResponse {
                status: *status,
                body: body.clone(),
            }),
            Some((None, detail)) => Err(anyhow!(detail.clone())),
            None => Ok(GatewayResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingProgressSink {
    pub(crate) lines: Mutex<Vec<String>>,
}

impl RecordingProgressSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }
}

impl DispatchProgressSink for RecordingProgressSink {
    fn info(&self, message: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(message.to_string());
    }
}
