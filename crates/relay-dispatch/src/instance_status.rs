//! One-shot connection-state probe for a gateway instance.

use relay_gateway::{GatewayClient, GatewayError};
use serde::Serialize;
use serde_json::Value;

pub const CONNECTED_STATE: &str = "CONNECTED";
const UNKNOWN_STATE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatusReport {
    pub instance: String,
    pub state: String,
    pub connected: bool,
    pub qr_code_available: bool,
}

impl InstanceStatusReport {
    /// Builds a report from a connection-state payload.
    ///
    /// `state` and `qrcode` are read at the top level first, then under an
    /// `instance` object.
    pub fn from_payload(instance: &str, payload: &Value) -> Self {
        let nested = payload.get("instance");
        let state = payload
            .get("state")
            .or_else(|| nested.and_then(|value| value.get("state")))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_STATE)
            .to_string();
        let qr_code_available = payload.get("qrcode").is_some()
            || nested.and_then(|value| value.get("qrcode")).is_some();
        Self {
            instance: instance.to_string(),
            connected: state == CONNECTED_STATE,
            state,
            qr_code_available,
        }
    }

    pub fn render(&self) -> String {
        let mut rendered = format!(
            "Instance: {}\nStatus: {} ({})\n",
            self.instance,
            if self.connected {
                "Connected"
            } else {
                "Disconnected"
            },
            self.state
        );
        if self.qr_code_available {
            rendered.push_str("QR code available for pairing\n");
        }
        rendered
    }
}

pub async fn probe_instance_status(
    client: &GatewayClient,
    instance: &str,
) -> Result<InstanceStatusReport, GatewayError> {
    let reply = client.query_state(instance).await?;
    let payload = reply.try_json()?;
    let report = InstanceStatusReport::from_payload(instance, &payload);
    tracing::debug!(
        instance,
        state = report.state.as_str(),
        connected = report.connected,
        "instance status probed"
    );
    Ok(report)
}

pub fn render_instance_status_failure(error: &GatewayError) -> String {
    match error {
        GatewayError::Rejected { status, body } => format!(
            "Failed to check instance status. Status code: {status}. Error: {body}"
        ),
        GatewayError::Transport { detail } => {
            format!("Error checking instance status: {detail}")
        }
        GatewayError::MalformedBody { detail, .. } => {
            format!("Error checking instance status: response is not valid JSON: {detail}")
        }
    }
}
