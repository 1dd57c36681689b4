//! Sequential batch dispatch with fixed pacing.
//!
//! Recipients are processed strictly in order, one gateway call at a time.
//! A failing recipient never stops the batch, and the engine never returns an
//! error: every failure is recorded as an outcome in the summary.

use std::time::Duration;

use relay_gateway::GatewayClient;

use crate::dispatch_one::{dispatch_one, DispatchKind, DispatchPayload};
use crate::options::DispatchOptions;
use crate::outcome::DispatchOutcome;
use crate::recipient::RecipientIdentifier;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered outcomes of one batch plus derived tallies.
pub struct BatchSummary {
    pub kind: DispatchKind,
    pub outcomes: Vec<DispatchOutcome>,
}

impl BatchSummary {
    pub fn new(kind: DispatchKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn header(&self) -> String {
        let noun = match self.kind {
            DispatchKind::Text => "messages",
            DispatchKind::Media => "media messages",
        };
        format!(
            "Sent {} {noun} successfully, {} failed.",
            self.success_count(),
            self.failure_count()
        )
    }

    /// Header line followed by one transcript line per recipient.
    pub fn render(&self) -> String {
        let transcript = self
            .outcomes
            .iter()
            .map(DispatchOutcome::render)
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n{transcript}", self.header())
    }
}

pub async fn dispatch_batch(
    client: &GatewayClient,
    recipients: &[RecipientIdentifier],
    payload: &DispatchPayload,
    options: &DispatchOptions,
) -> BatchSummary {
    let instance = client.resolve_instance(options.instance.as_deref());
    let total = recipients.len();
    let mut summary = BatchSummary::new(payload.kind());
    tracing::debug!(
        kind = payload.kind().as_str(),
        instance = instance.as_str(),
        total,
        interval_seconds = options.interval_seconds,
        "batch dispatch started"
    );

    for (index, recipient) in recipients.iter().enumerate() {
        options.progress.info(&format!(
            "Sending {} to {recipient} ({}/{total})",
            payload.noun(),
            index + 1
        ));
        let outcome = dispatch_one(
            client,
            &instance,
            recipient,
            payload,
            options.progress.as_ref(),
        )
        .await;
        tracing::info!(
            index = index + 1,
            total,
            recipient = outcome.recipient(),
            success = outcome.is_success(),
            "batch dispatch outcome"
        );
        summary.outcomes.push(outcome);

        let is_last = index + 1 == total;
        if !is_last && options.interval_seconds > 0 {
            options.progress.info(&format!(
                "Waiting for {} seconds before next message...",
                options.interval_seconds
            ));
            tokio::time::sleep(Duration::from_secs(options.interval_seconds)).await;
        }
    }

    tracing::debug!(
        successes = summary.success_count(),
        failures = summary.failure_count(),
        "batch dispatch finished"
    );
    summary
}
