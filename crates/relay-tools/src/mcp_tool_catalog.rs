//! Tool descriptors and argument handling for the dispatch tools.

use std::sync::Arc;

use anyhow::{bail, Result};
use relay_dispatch::{DispatchOptions, DispatchProgressSink, DispatchService, RecipientIdentifier};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const MCP_TOOL_SEND_MESSAGE: &str = "send_whatsapp_message";
pub const MCP_TOOL_SEND_BATCH: &str = "send_whatsapp_with_interval";
pub const MCP_TOOL_SEND_MEDIA: &str = "send_whatsapp_media";
pub const MCP_TOOL_SEND_MEDIA_BATCH: &str = "send_whatsapp_media_with_interval";
pub const MCP_TOOL_INSTANCE_STATUS: &str = "check_instance_status";

#[derive(Debug, Clone, PartialEq)]
pub struct McpToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Display text returned by a tool plus whether the call itself was unusable.
pub struct McpToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl McpToolOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendMessageArgs {
    phone_number: RecipientIdentifier,
    message: String,
    #[serde(default)]
    instance_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendBatchArgs {
    phone_numbers: Vec<RecipientIdentifier>,
    message: String,
    #[serde(default)]
    instance_name: Option<String>,
    #[serde(default)]
    interval_seconds: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendMediaArgs {
    phone_number: RecipientIdentifier,
    media_url: String,
    media_type: String,
    #[serde(default)]
    instance_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendMediaBatchArgs {
    phone_numbers: Vec<RecipientIdentifier>,
    media_url: String,
    media_type: String,
    #[serde(default)]
    instance_name: Option<String>,
    #[serde(default)]
    interval_seconds: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstanceStatusArgs {
    #[serde(default)]
    instance_name: Option<String>,
}

pub fn dispatch_tool_descriptors() -> Vec<McpToolDescriptor> {
    let phone = json!({
        "type": ["string", "integer"],
        "description": "Phone number including country code and area code; symbols and spaces are ignored"
    });
    let phones = json!({
        "type": "array",
        "items": phone.clone(),
        "description": "Phone numbers to send to, processed in order"
    });
    let instance = json!({
        "type": "string",
        "description": "Gateway instance name (optional, uses the default instance if omitted)"
    });
    let interval = json!({
        "type": "integer",
        "minimum": 0,
        "default": 0,
        "description": "Seconds to wait between consecutive recipients"
    });
    let media_url = json!({
        "type": "string",
        "description": "URL of the media to send"
    });
    let media_type = json!({
        "type": "string",
        "enum": ["image", "video", "document", "audio"],
        "description": "Media type (case-insensitive)"
    });
    let message = json!({
        "type": "string",
        "description": "Text message to send"
    });

    vec![
        McpToolDescriptor {
            name: MCP_TOOL_SEND_MESSAGE.to_string(),
            description: "Send a WhatsApp text message to one phone number".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "phone_number": phone,
                    "message": message,
                    "instance_name": instance,
                },
                "required": ["phone_number", "message"],
                "additionalProperties": false
            }),
        },
        McpToolDescriptor {
            name: MCP_TOOL_SEND_BATCH.to_string(),
            description:
                "Send the same WhatsApp text message to several phone numbers with a fixed interval between sends"
                    .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "phone_numbers": phones,
                    "message": message,
                    "instance_name": instance,
                    "interval_seconds": interval,
                },
                "required": ["phone_numbers", "message"],
                "additionalProperties": false
            }),
        },
        McpToolDescriptor {
            name: MCP_TOOL_SEND_MEDIA.to_string(),
            description: "Send a WhatsApp media message (image, video, document, or audio) to one phone number"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "phone_number": phone,
                    "media_url": media_url,
                    "media_type": media_type,
                    "instance_name": instance,
                },
                "required": ["phone_number", "media_url", "media_type"],
                "additionalProperties": false
            }),
        },
        McpToolDescriptor {
            name: MCP_TOOL_SEND_MEDIA_BATCH.to_string(),
            description:
                "Send the same WhatsApp media message to several phone numbers with a fixed interval between sends"
                    .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "phone_numbers": phones,
                    "media_url": media_url,
                    "media_type": media_type,
                    "instance_name": instance,
                    "interval_seconds": interval,
                },
                "required": ["phone_numbers", "media_url", "media_type"],
                "additionalProperties": false
            }),
        },
        McpToolDescriptor {
            name: MCP_TOOL_INSTANCE_STATUS.to_string(),
            description: "Check whether a gateway instance is connected".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "instance_name": instance,
                },
                "additionalProperties": false
            }),
        },
    ]
}

pub fn is_dispatch_tool(name: &str) -> bool {
    matches!(
        name,
        MCP_TOOL_SEND_MESSAGE
            | MCP_TOOL_SEND_BATCH
            | MCP_TOOL_SEND_MEDIA
            | MCP_TOOL_SEND_MEDIA_BATCH
            | MCP_TOOL_INSTANCE_STATUS
    )
}

/// Runs one dispatch tool.
///
/// Unknown tool names are an error. Arguments that do not match the tool's
/// schema produce an `is_error` output; dispatch failures are reported inside
/// the returned text.
pub async fn execute_dispatch_tool(
    service: &DispatchService,
    progress: &Arc<dyn DispatchProgressSink>,
    tool_name: &str,
    arguments: Value,
) -> Result<McpToolOutput> {
    match tool_name {
        MCP_TOOL_SEND_MESSAGE => {
            let args = match parse_arguments::<SendMessageArgs>(tool_name, arguments) {
                Ok(args) => args,
                Err(output) => return Ok(output),
            };
            let text = service
                .send_one(
                    &args.phone_number,
                    &args.message,
                    args.instance_name.as_deref(),
                    progress.as_ref(),
                )
                .await;
            Ok(McpToolOutput::ok(text))
        }
        MCP_TOOL_SEND_BATCH => {
            let args = match parse_arguments::<SendBatchArgs>(tool_name, arguments) {
                Ok(args) => args,
                Err(output) => return Ok(output),
            };
            let options = batch_options(progress, args.instance_name, args.interval_seconds);
            let text = service
                .send_batch(&args.phone_numbers, &args.message, &options)
                .await;
            Ok(McpToolOutput::ok(text))
        }
        MCP_TOOL_SEND_MEDIA => {
            let args = match parse_arguments::<SendMediaArgs>(tool_name, arguments) {
                Ok(args) => args,
                Err(output) => return Ok(output),
            };
            let text = service
                .send_media_one(
                    &args.phone_number,
                    &args.media_url,
                    &args.media_type,
                    args.instance_name.as_deref(),
                    progress.as_ref(),
                )
                .await;
            Ok(McpToolOutput::ok(text))
        }
        MCP_TOOL_SEND_MEDIA_BATCH => {
            let args = match parse_arguments::<SendMediaBatchArgs>(tool_name, arguments) {
                Ok(args) => args,
                Err(output) => return Ok(output),
            };
            let options = batch_options(progress, args.instance_name, args.interval_seconds);
            let text = service
                .send_media_batch(
                    &args.phone_numbers,
                    &args.media_url,
                    &args.media_type,
                    &options,
                )
                .await;
            Ok(McpToolOutput::ok(text))
        }
        MCP_TOOL_INSTANCE_STATUS => {
            let args = match parse_arguments::<InstanceStatusArgs>(tool_name, arguments) {
                Ok(args) => args,
                Err(output) => return Ok(output),
            };
            let text = service
                .check_instance_status(args.instance_name.as_deref(), progress.as_ref())
                .await;
            Ok(McpToolOutput::ok(text))
        }
        other => bail!("unknown mcp tool '{}'", other),
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool_name: &str,
    arguments: Value,
) -> std::result::Result<T, McpToolOutput> {
    serde_json::from_value::<T>(arguments).map_err(|error| {
        McpToolOutput::error(format!(
            "invalid arguments for tool '{tool_name}': {error}"
        ))
    })
}

fn batch_options(
    progress: &Arc<dyn DispatchProgressSink>,
    instance_name: Option<String>,
    interval_seconds: i64,
) -> DispatchOptions {
    DispatchOptions::default()
        .with_instance(instance_name)
        .with_interval_seconds(u64::try_from(interval_seconds).unwrap_or(0))
        .with_progress(progress.clone())
}
