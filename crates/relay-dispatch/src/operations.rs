//! Display-string operations exposed to command and tool hosts.
//!
//! Every operation returns text, never an error. Single sends return one
//! outcome line, batches return the rendered summary, and the status check
//! returns either the status report or a failure sentence.

use relay_gateway::GatewayClient;

use crate::dispatch_batch::dispatch_batch;
use crate::dispatch_one::{dispatch_one, DispatchPayload};
use crate::instance_status::{probe_instance_status, render_instance_status_failure};
use crate::options::DispatchOptions;
use crate::progress::DispatchProgressSink;
use crate::recipient::RecipientIdentifier;

#[derive(Debug, Clone)]
pub struct DispatchService {
    client: GatewayClient,
}

impl DispatchService {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    pub async fn send_one(
        &self,
        phone: &RecipientIdentifier,
        message: &str,
        instance: Option<&str>,
        progress: &dyn DispatchProgressSink,
    ) -> String {
        let instance = self.client.resolve_instance(instance);
        dispatch_one(
            &self.client,
            &instance,
            phone,
            &DispatchPayload::text(message),
            progress,
        )
        .await
        .render()
    }

    pub async fn send_batch(
        &self,
        phones: &[RecipientIdentifier],
        message: &str,
        options: &DispatchOptions,
    ) -> String {
        dispatch_batch(
            &self.client,
            phones,
            &DispatchPayload::text(message),
            options,
        )
        .await
        .render()
    }

    pub async fn send_media_one(
        &self,
        phone: &RecipientIdentifier,
        media_url: &str,
        media_type: &str,
        instance: Option<&str>,
        progress: &dyn DispatchProgressSink,
    ) -> String {
        let instance = self.client.resolve_instance(instance);
        dispatch_one(
            &self.client,
            &instance,
            phone,
            &DispatchPayload::media(media_url, media_type),
            progress,
        )
        .await
        .render()
    }

    pub async fn send_media_batch(
        &self,
        phones: &[RecipientIdentifier],
        media_url: &str,
        media_type: &str,
        options: &DispatchOptions,
    ) -> String {
        dispatch_batch(
            &self.client,
            phones,
            &DispatchPayload::media(media_url, media_type),
            options,
        )
        .await
        .render()
    }

    pub async fn check_instance_status(
        &self,
        instance: Option<&str>,
        progress: &dyn DispatchProgressSink,
    ) -> String {
        let instance = self.client.resolve_instance(instance);
        progress.info(&format!("Checking status of instance {instance}"));
        match probe_instance_status(&self.client, &instance).await {
            Ok(report) => report.render(),
            Err(error) => render_instance_status_failure(&error),
        }
    }
}

impl From<GatewayClient> for DispatchService {
    fn from(client: GatewayClient) -> Self {
        Self::new(client)
    }
}
