use std::sync::Arc;

use anyhow::{Context, Result};
use relay_cli::{
    gateway_config_from_cli, resolve_cli_command, Cli, CliCommand, CliSendCommand,
    CliSendPayload, CliSendRecipients,
};
use relay_dispatch::{
    DispatchOptions, DispatchProgressSink, DispatchService, RecipientIdentifier,
    TracingProgressSink,
};
use relay_gateway::GatewayClient;
use relay_tools::{serve_mcp_stdio, McpServerState};

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    let command = resolve_cli_command(&cli)?;
    let config = gateway_config_from_cli(&cli);
    config
        .validate()
        .context("invalid gateway configuration")?;
    tracing::debug!(
        base_url = %config.base_url,
        default_instance = %config.default_instance,
        "gateway configured"
    );
    let service = DispatchService::new(GatewayClient::new(config)?);

    if let CliCommand::McpServer = command {
        serve_mcp_stdio(&McpServerState::new(service)).await?;
        return Ok(());
    }

    let progress: Arc<dyn DispatchProgressSink> = Arc::new(TracingProgressSink);
    let output = execute_one_shot_command(&service, &command, &progress).await;
    if let Some(output) = output {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Runs a one-shot command and returns the text to print. MCP server mode
/// produces no one-shot output.
pub(crate) async fn execute_one_shot_command(
    service: &DispatchService,
    command: &CliCommand,
    progress: &Arc<dyn DispatchProgressSink>,
) -> Option<String> {
    match command {
        CliCommand::McpServer => None,
        CliCommand::CheckInstanceStatus { instance } => Some(
            service
                .check_instance_status(instance.as_deref(), progress.as_ref())
                .await,
        ),
        CliCommand::Send(send) => Some(execute_send_command(service, send, progress).await),
    }
}

async fn execute_send_command(
    service: &DispatchService,
    send: &CliSendCommand,
    progress: &Arc<dyn DispatchProgressSink>,
) -> String {
    let instance = send.instance.as_deref();
    match &send.recipients {
        CliSendRecipients::One(recipient) => {
            let recipient = RecipientIdentifier::from(recipient.as_str());
            match &send.payload {
                CliSendPayload::Text(text) => {
                    service
                        .send_one(&recipient, text, instance, progress.as_ref())
                        .await
                }
                CliSendPayload::Media {
                    media_url,
                    media_type,
                } => {
                    service
                        .send_media_one(
                            &recipient,
                            media_url,
                            media_type,
                            instance,
                            progress.as_ref(),
                        )
                        .await
                }
            }
        }
        CliSendRecipients::Batch(recipients) => {
            let recipients = recipients
                .iter()
                .map(|recipient| RecipientIdentifier::from(recipient.as_str()))
                .collect::<Vec<_>>();
            let options = DispatchOptions::default()
                .with_instance(send.instance.clone())
                .with_interval_seconds(send.interval_seconds)
                .with_progress(progress.clone());
            match &send.payload {
                CliSendPayload::Text(text) => service.send_batch(&recipients, text, &options).await,
                CliSendPayload::Media {
                    media_url,
                    media_type,
                } => {
                    service
                        .send_media_batch(&recipients, media_url, media_type, &options)
                        .await
                }
            }
        }
    }
}
