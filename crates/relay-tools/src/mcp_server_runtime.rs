use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use relay_dispatch::{DispatchProgressSink, DispatchService, TracingProgressSink};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp_tool_catalog::{dispatch_tool_descriptors, execute_dispatch_tool, is_dispatch_tool};

pub const MCP_JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const MCP_ERROR_PARSE: i64 = -32700;
pub const MCP_ERROR_INVALID_REQUEST: i64 = -32600;
pub const MCP_ERROR_METHOD_NOT_FOUND: i64 = -32601;
pub const MCP_ERROR_INVALID_PARAMS: i64 = -32602;
const MCP_SERVER_NAME: &str = "relay";
const MCP_CONTENT_TYPE_TEXT: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McpServeReport {
    pub processed_frames: usize,
    pub error_count: usize,
}

#[derive(Clone)]
/// Shared state handed to every request of one MCP session.
pub struct McpServerState {
    service: DispatchService,
    progress: Arc<dyn DispatchProgressSink>,
}

impl std::fmt::Debug for McpServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServerState")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl McpServerState {
    pub fn new(service: DispatchService) -> Self {
        Self {
            service,
            progress: Arc::new(TracingProgressSink),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgressSink>) -> Self {
        self.progress = progress;
        self
    }
}

#[derive(Debug, Clone)]
struct McpJsonRpcRequest {
    id: Option<Value>,
    method: String,
    params: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone)]
struct McpDispatchError {
    id: Value,
    code: i64,
    message: String,
}

impl McpDispatchError {
    fn new(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            code,
            message: message.into(),
        }
    }
}

/// Serves MCP requests on the process stdin/stdout until stdin closes.
pub async fn serve_mcp_stdio(state: &McpServerState) -> Result<McpServeReport> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    let report = serve_mcp_jsonrpc_lines(&mut reader, &mut writer, state).await?;
    tracing::info!(
        processed_frames = report.processed_frames,
        error_count = report.error_count,
        "mcp server input closed"
    );
    Ok(report)
}

/// Reads one JSON-RPC frame per line and writes one response line per request.
///
/// Blank lines are skipped. Frames that are not valid UTF-8 or not valid JSON
/// are answered with a parse error and the loop keeps reading. Notifications
/// are processed without a response.
///
/// Requests are handled one at a time in arrival order, so a paced batch
/// tool call holds back every later frame (including `ping`) until its
/// summary has been written.
pub async fn serve_mcp_jsonrpc_lines<R, W>(
    reader: &mut R,
    writer: &mut W,
    state: &McpServerState,
) -> Result<McpServeReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut processed_frames = 0usize;
    let mut error_count = 0usize;
    let mut line = Vec::new();

    loop {
        line.clear();
        let bytes = reader
            .read_until(b'\n', &mut line)
            .await
            .context("failed to read mcp frame line")?;
        if bytes == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        processed_frames = processed_frames.saturating_add(1);

        let frame = match decode_jsonrpc_line(&line) {
            Ok(frame) => frame,
            Err(error) => {
                error_count = error_count.saturating_add(1);
                let response = jsonrpc_error_frame(
                    Value::Null,
                    MCP_ERROR_PARSE,
                    format!("failed to parse mcp frame: {error:#}"),
                );
                write_jsonrpc_line(writer, &response).await?;
                continue;
            }
        };

        let response = match parse_jsonrpc_request(&frame) {
            Ok(request) => {
                let Some(id) = request.id.clone() else {
                    tracing::debug!(method = %request.method, "mcp notification received");
                    continue;
                };
                match dispatch_jsonrpc_request(&request, id.clone(), state).await {
                    Ok(result) => jsonrpc_result_frame(id, result),
                    Err(error) => {
                        error_count = error_count.saturating_add(1);
                        jsonrpc_error_frame(error.id, error.code, error.message)
                    }
                }
            }
            Err(error) => {
                error_count = error_count.saturating_add(1);
                jsonrpc_error_frame(error.id, error.code, error.message)
            }
        };
        write_jsonrpc_line(writer, &response).await?;
    }

    Ok(McpServeReport {
        processed_frames,
        error_count,
    })
}

fn decode_jsonrpc_line(line: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(line).context("frame is not valid UTF-8")?;
    serde_json::from_str::<Value>(text.trim()).context("frame is not valid JSON")
}

fn parse_jsonrpc_request(value: &Value) -> Result<McpJsonRpcRequest, McpDispatchError> {
    let Some(object) = value.as_object() else {
        return Err(McpDispatchError::new(
            Value::Null,
            MCP_ERROR_INVALID_REQUEST,
            "jsonrpc request must be an object",
        ));
    };
    let id = object.get("id").cloned();
    let error_id = id.clone().unwrap_or(Value::Null);
    let jsonrpc = object
        .get("jsonrpc")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if jsonrpc != MCP_JSONRPC_VERSION {
        return Err(McpDispatchError::new(
            error_id,
            MCP_ERROR_INVALID_REQUEST,
            format!("jsonrpc must be '{}'", MCP_JSONRPC_VERSION),
        ));
    }
    let method = object
        .get("method")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            McpDispatchError::new(
                error_id.clone(),
                MCP_ERROR_INVALID_REQUEST,
                "jsonrpc request must include non-empty method",
            )
        })?;
    let params = match object.get("params") {
        Some(Value::Object(params)) => params.clone(),
        Some(Value::Null) | None => serde_json::Map::new(),
        Some(_) => {
            return Err(McpDispatchError::new(
                error_id,
                MCP_ERROR_INVALID_PARAMS,
                "jsonrpc request params must be an object",
            ))
        }
    };
    Ok(McpJsonRpcRequest {
        id,
        method: method.to_string(),
        params,
    })
}

async fn dispatch_jsonrpc_request(
    request: &McpJsonRpcRequest,
    id: Value,
    state: &McpServerState,
) -> Result<Value, McpDispatchError> {
    match request.method.as_str() {
        "initialize" => Ok(handle_initialize()),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(handle_tools_list()),
        "tools/call" => handle_tools_call(state, &request.params)
            .await
            .map_err(|error| McpDispatchError::new(id, MCP_ERROR_INVALID_PARAMS, error.to_string())),
        other => Err(McpDispatchError::new(
            id,
            MCP_ERROR_METHOD_NOT_FOUND,
            format!("unsupported method '{}'", other),
        )),
    }
}

fn handle_initialize() -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "serverInfo": {
            "name": MCP_SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        }
    })
}

fn handle_tools_list() -> Value {
    json!({
        "tools": dispatch_tool_descriptors()
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema
                })
            })
            .collect::<Vec<_>>()
    })
}

async fn handle_tools_call(
    state: &McpServerState,
    params: &serde_json::Map<String, Value>,
) -> Result<Value> {
    let tool_name = params
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("tools/call requires non-empty field 'name'"))?;
    let arguments = match params.get("arguments") {
        Some(Value::Object(arguments)) => Value::Object(arguments.clone()),
        Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
        Some(_) => bail!("tools/call field 'arguments' must be an object when provided"),
    };
    if !is_dispatch_tool(tool_name) {
        bail!("unknown mcp tool '{}'", tool_name);
    }

    tracing::debug!(tool = tool_name, "mcp tools/call");
    let output = execute_dispatch_tool(&state.service, &state.progress, tool_name, arguments).await?;
    Ok(mcp_tool_call_result(&output.text, output.is_error))
}

fn mcp_tool_call_result(text: &str, is_error: bool) -> Value {
    json!({
        "content": [{
            "type": MCP_CONTENT_TYPE_TEXT,
            "text": text
        }],
        "isError": is_error,
    })
}

async fn write_jsonrpc_line<W>(writer: &mut W, value: &Value) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_vec(value).context("failed to encode mcp jsonrpc response")?;
    encoded.push(b'\n');
    writer
        .write_all(&encoded)
        .await
        .context("failed to write mcp response line")?;
    writer
        .flush()
        .await
        .context("failed to flush mcp frame output")?;
    Ok(())
}

pub fn jsonrpc_request_frame(id: Value, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": MCP_JSONRPC_VERSION,
        "id": id,
        "method": method,
        "params": params,
    })
}

fn jsonrpc_result_frame(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": MCP_JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

fn jsonrpc_error_frame(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": MCP_JSONRPC_VERSION,
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}
