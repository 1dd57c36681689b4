use httpmock::prelude::*;
use relay_dispatch::DispatchService;
use relay_gateway::{GatewayClient, GatewayConfig};
use relay_tools::{jsonrpc_request_frame, serve_mcp_jsonrpc_lines, McpServerState};
use serde_json::{json, Value};

fn encode_lines(frames: &[Value]) -> Vec<u8> {
    let mut encoded = Vec::new();
    for frame in frames {
        encoded.extend_from_slice(&serde_json::to_vec(frame).expect("encode frame"));
        encoded.push(b'\n');
    }
    encoded
}

fn decode_lines(raw: &[u8]) -> Vec<Value> {
    std::str::from_utf8(raw)
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json response line"))
        .collect()
}

#[tokio::test]
async fn integration_mcp_session_runs_batch_tool_against_gateway() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/message/sendText/campaign")
            .header("apikey", "mcp-key")
            .json_body(json!({"number": "5511900000001", "text": "promo"}));
        then.status(201).json_body(json!({"status": "PENDING"}));
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/message/sendText/campaign")
            .json_body(json!({"number": "5511900000002", "text": "promo"}));
        then.status(400).body("number not on whatsapp");
    });

    let client = GatewayClient::new(GatewayConfig {
        base_url: server.base_url(),
        api_key: "mcp-key".to_string(),
        default_instance: "primary".to_string(),
    })
    .expect("client");
    let state = McpServerState::new(DispatchService::new(client));

    let raw = encode_lines(&[
        jsonrpc_request_frame(json!(1), "initialize", json!({"capabilities": {}})),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        jsonrpc_request_frame(
            json!(2),
            "tools/call",
            json!({
                "name": "send_whatsapp_with_interval",
                "arguments": {
                    "phone_numbers": [5511900000001_i64, "5511900000002", "12"],
                    "message": "promo",
                    "instance_name": "campaign",
                    "interval_seconds": 0
                }
            }),
        ),
    ]);
    let mut reader = tokio::io::BufReader::new(raw.as_slice());
    let mut writer = Vec::new();
    let report = serve_mcp_jsonrpc_lines(&mut reader, &mut writer, &state)
        .await
        .expect("serve");

    first.assert();
    second.assert();
    assert_eq!(report.processed_frames, 3);
    assert_eq!(report.error_count, 0);

    let responses = decode_lines(&writer);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["isError"], false);
    let text = responses[1]["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    assert_eq!(
        text,
        "Sent 1 messages successfully, 2 failed.\n\
         ✅ Message sent successfully to 5511900000001.\n\
         ❌ Failed to send message to 5511900000002. Status code: 400. Error: number not on whatsapp\n\
         ❌ Invalid phone number '12'. Include the country code and area code."
    );
}
