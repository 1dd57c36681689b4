use clap::{ArgAction, Parser};
use relay_gateway::{DEFAULT_GATEWAY_BASE_URL, DEFAULT_GATEWAY_INSTANCE};

#[derive(Debug, Parser)]
#[command(
    name = "relay",
    about = "Dispatch WhatsApp text and media messages through an Evolution-style gateway",
    version
)]
pub struct Cli {
    #[arg(
        long = "gateway-base-url",
        env = "BASE_API_URL",
        default_value = DEFAULT_GATEWAY_BASE_URL,
        help = "Base URL of the messaging gateway"
    )]
    pub gateway_base_url: String,

    #[arg(
        long = "gateway-api-key",
        env = "API_KEY",
        hide_env_values = true,
        help = "API key sent in the apikey header of every gateway request"
    )]
    pub gateway_api_key: Option<String>,

    #[arg(
        long = "default-instance",
        env = "DEFAULT_INSTANCE",
        default_value = DEFAULT_GATEWAY_INSTANCE,
        help = "Gateway instance used when a request does not name one"
    )]
    pub default_instance: String,

    #[arg(
        long = "instance",
        value_name = "name",
        help = "Gateway instance for this invocation (defaults to --default-instance)"
    )]
    pub instance: Option<String>,

    #[arg(
        long = "mcp-server",
        env = "RELAY_MCP_SERVER",
        default_value_t = false,
        conflicts_with = "send_recipient",
        conflicts_with = "send_recipients",
        conflicts_with = "check_instance_status",
        help = "Run MCP tool server mode over stdin/stdout using newline-delimited JSON-RPC"
    )]
    pub mcp_server: bool,

    #[arg(
        long = "send-recipient",
        value_name = "phone",
        conflicts_with = "send_recipients",
        conflicts_with = "check_instance_status",
        help = "Send one message to this phone number and exit"
    )]
    pub send_recipient: Option<String>,

    #[arg(
        long = "send-recipients",
        value_name = "phone",
        value_delimiter = ',',
        action = ArgAction::Append,
        conflicts_with = "check_instance_status",
        help = "Send the same message to each phone number in order and print a summary"
    )]
    pub send_recipients: Vec<String>,

    #[arg(
        long = "send-text",
        value_name = "text",
        conflicts_with = "send_media_url",
        conflicts_with = "check_instance_status",
        conflicts_with = "mcp_server",
        help = "Text payload for --send-recipient/--send-recipients"
    )]
    pub send_text: Option<String>,

    #[arg(
        long = "send-media-url",
        value_name = "url",
        requires = "send_media_type",
        conflicts_with = "check_instance_status",
        conflicts_with = "mcp_server",
        help = "Media URL payload for --send-recipient/--send-recipients"
    )]
    pub send_media_url: Option<String>,

    #[arg(
        long = "send-media-type",
        value_name = "kind",
        requires = "send_media_url",
        conflicts_with = "check_instance_status",
        conflicts_with = "mcp_server",
        help = "Media type for --send-media-url (image, video, document, audio)"
    )]
    pub send_media_type: Option<String>,

    #[arg(
        long = "send-interval-seconds",
        value_name = "seconds",
        default_value_t = 0,
        help = "Pause between consecutive recipients of --send-recipients"
    )]
    pub send_interval_seconds: u64,

    #[arg(
        long = "check-instance-status",
        default_value_t = false,
        help = "Query the connection state of the instance and exit"
    )]
    pub check_instance_status: bool,
}
