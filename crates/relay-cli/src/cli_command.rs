//! Resolution of parsed flags into one runnable command.

use anyhow::{bail, Result};
use relay_gateway::GatewayConfig;

use crate::cli_args::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliSendRecipients {
    One(String),
    Batch(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliSendPayload {
    Text(String),
    Media { media_url: String, media_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliSendCommand {
    pub recipients: CliSendRecipients,
    pub payload: CliSendPayload,
    pub instance: Option<String>,
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    McpServer,
    Send(CliSendCommand),
    CheckInstanceStatus { instance: Option<String> },
}

pub fn gateway_config_from_cli(cli: &Cli) -> GatewayConfig {
    GatewayConfig {
        base_url: cli.gateway_base_url.trim().to_string(),
        api_key: cli
            .gateway_api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        default_instance: cli.default_instance.trim().to_string(),
    }
}

pub fn resolve_cli_command(cli: &Cli) -> Result<CliCommand> {
    let instance = resolve_non_empty_cli_value(cli.instance.as_deref());
    if cli.mcp_server {
        return Ok(CliCommand::McpServer);
    }
    if cli.check_instance_status {
        return Ok(CliCommand::CheckInstanceStatus { instance });
    }

    let recipients = match (&cli.send_recipient, cli.send_recipients.as_slice()) {
        (Some(recipient), []) => CliSendRecipients::One(recipient.clone()),
        (None, []) => {
            bail!("no command selected: pass --mcp-server, --send-recipient, --send-recipients, or --check-instance-status")
        }
        (None, recipients) => CliSendRecipients::Batch(
            recipients
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
        ),
        (Some(_), _) => bail!("--send-recipient and --send-recipients cannot be combined"),
    };
    if matches!(&recipients, CliSendRecipients::One(_)) && cli.send_interval_seconds > 0 {
        bail!("--send-interval-seconds only applies to --send-recipients");
    }

    let payload = match (&cli.send_text, &cli.send_media_url, &cli.send_media_type) {
        (Some(text), None, None) => CliSendPayload::Text(text.clone()),
        (None, Some(media_url), Some(media_type)) => CliSendPayload::Media {
            media_url: media_url.trim().to_string(),
            media_type: media_type.trim().to_string(),
        },
        (None, None, None) => {
            bail!("send requires --send-text or --send-media-url with --send-media-type")
        }
        _ => bail!("--send-text cannot be combined with --send-media-url/--send-media-type"),
    };

    Ok(CliCommand::Send(CliSendCommand {
        recipients,
        payload,
        instance,
        interval_seconds: cli.send_interval_seconds,
    }))
}

fn resolve_non_empty_cli_value(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
