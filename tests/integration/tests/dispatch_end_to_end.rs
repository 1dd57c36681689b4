use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use relay_dispatch::{
    DispatchOptions, DispatchProgressSink, DispatchService, RecipientIdentifier,
};
use relay_gateway::{GatewayClient, GatewayConfig, GatewayRequest, GatewayResponse, GatewayTransport};
use serde_json::json;

/// Replays scripted gateway replies in call order; `None` simulates a
/// transport fault.
struct ScriptedTransport {
    replies: Mutex<VecDeque<Option<GatewayResponse>>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Option<GatewayResponse>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl GatewayTransport for ScriptedTransport {
    async fn send(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Some(ok_reply()));
        match reply {
            Some(response) => Ok(response),
            None => bail!("connection reset by peer"),
        }
    }
}

#[derive(Default)]
struct CollectingProgress {
    lines: Mutex<Vec<String>>,
}

impl DispatchProgressSink for CollectingProgress {
    fn info(&self, message: &str) {
        self.lines
            .lock()
            .expect("progress lock")
            .push(message.to_string());
    }
}

fn ok_reply() -> GatewayResponse {
    GatewayResponse {
        status: 201,
        body: json!({"key": {"id": "msg-1"}}).to_string(),
    }
}

fn config() -> GatewayConfig {
    GatewayConfig {
        base_url: "https://gateway.test".to_string(),
        api_key: "integration-key".to_string(),
        default_instance: "primary".to_string(),
    }
}

fn service_with(transport: Arc<ScriptedTransport>) -> DispatchService {
    DispatchService::new(GatewayClient::with_transport(config(), transport))
}

fn recipients(values: &[&str]) -> Vec<RecipientIdentifier> {
    values.iter().map(|value| RecipientIdentifier::from(*value)).collect()
}

#[tokio::test]
async fn integration_mixed_batch_reports_partial_success_in_order() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let service = service_with(transport.clone());

    let summary = service
        .send_batch(
            &recipients(&["11999998888", "abc"]),
            "hello",
            &DispatchOptions::default(),
        )
        .await;

    let lines = summary.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Sent 1 messages successfully, 1 failed.");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with('✅'));
    assert!(lines[1].contains("11999998888"));
    assert!(lines[2].contains("Invalid phone number 'abc'"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].endpoint,
        "https://gateway.test/message/sendText/primary"
    );
    assert!(requests[0]
        .headers
        .iter()
        .any(|(name, value)| name == "apikey" && value == "integration-key"));
    assert_eq!(
        requests[0].body,
        Some(json!({"number": "11999998888", "text": "hello"}))
    );
}

#[tokio::test]
async fn integration_media_failure_embeds_status_and_body() {
    let transport = Arc::new(ScriptedTransport::new(vec![Some(GatewayResponse {
        status: 500,
        body: "internal gateway fault".to_string(),
    })]));
    let service = service_with(transport.clone());
    let progress = CollectingProgress::default();

    let line = service
        .send_media_one(
            &RecipientIdentifier::from("5511999998888"),
            "https://cdn.test/cat.png",
            "IMAGE",
            None,
            &progress,
        )
        .await;

    assert!(line.starts_with('❌'));
    assert!(line.contains("5511999998888"));
    assert!(line.contains("500"));
    assert!(line.contains("internal gateway fault"));
    assert_eq!(
        transport.requests()[0].body,
        Some(json!({
            "number": "5511999998888",
            "mediatype": "image",
            "media": "https://cdn.test/cat.png"
        }))
    );
}

#[tokio::test]
async fn integration_transport_fault_does_not_stop_the_batch() {
    let transport = Arc::new(ScriptedTransport::new(vec![None, Some(ok_reply())]));
    let service = service_with(transport.clone());

    let summary = service
        .send_batch(
            &[
                RecipientIdentifier::from(5511900000001_i64),
                RecipientIdentifier::from("5511900000002"),
            ],
            "hello",
            &DispatchOptions::default().with_instance(Some("sales".to_string())),
        )
        .await;

    let lines = summary.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Sent 1 messages successfully, 1 failed.");
    assert!(lines[1].contains("Error sending message to 5511900000001"));
    assert!(lines[1].contains("connection reset by peer"));
    assert!(lines[2].starts_with('✅'));
    assert!(transport
        .requests()
        .iter()
        .all(|request| request.endpoint.ends_with("/message/sendText/sales")));
}

#[tokio::test(start_paused = true)]
async fn integration_batch_pacing_waits_between_recipients_only() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let service = service_with(transport.clone());
    let progress = Arc::new(CollectingProgress::default());
    let options = DispatchOptions::default()
        .with_interval_seconds(5)
        .with_progress(progress.clone());

    let started = tokio::time::Instant::now();
    let summary = service
        .send_media_batch(
            &recipients(&["5511900000001", "5511900000002", "5511900000003"]),
            "https://cdn.test/doc.pdf",
            "document",
            &options,
        )
        .await;

    assert_eq!(started.elapsed(), Duration::from_secs(10));
    assert!(summary.starts_with("Sent 3 media messages successfully, 0 failed."));
    let waits = progress
        .lines
        .lock()
        .expect("progress lock")
        .iter()
        .filter(|line| line.starts_with("Waiting for 5 seconds"))
        .count();
    assert_eq!(waits, 2);
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn integration_instance_status_connected_and_pairing() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Some(GatewayResponse {
            status: 200,
            body: json!({"state": "CONNECTED"}).to_string(),
        }),
        Some(GatewayResponse {
            status: 200,
            body: json!({"state": "CLOSE", "qrcode": "2@abc"}).to_string(),
        }),
    ]));
    let service = service_with(transport.clone());
    let progress = CollectingProgress::default();

    let connected = service.check_instance_status(None, &progress).await;
    assert!(connected.contains("Status: Connected"));
    assert!(!connected.contains("QR code"));

    let pairing = service.check_instance_status(Some("sales"), &progress).await;
    assert!(pairing.contains("Instance: sales"));
    assert!(pairing.contains("Status: Disconnected (CLOSE)"));
    assert!(pairing.contains("QR code available for pairing"));

    let requests = transport.requests();
    assert_eq!(requests[0].method.as_str(), "GET");
    assert_eq!(
        requests[0].endpoint,
        "https://gateway.test/instance/connectionState/primary"
    );
    assert_eq!(requests[1].body, None);
}
