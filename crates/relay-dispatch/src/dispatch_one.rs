//! Single-recipient dispatch.
//!
//! Validation runs before any network activity: an invalid recipient or media
//! type produces a failure outcome without touching the gateway. Gateway and
//! transport failures are folded into the returned outcome as well.

use relay_gateway::{GatewayClient, MediaKind};

use crate::outcome::{DispatchFailure, DispatchOutcome, OutcomeContent};
use crate::progress::DispatchProgressSink;
use crate::recipient::{normalize_recipient, RecipientIdentifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Text,
    Media,
}

impl DispatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Media => "media",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchPayload {
    Text {
        message: String,
    },
    /// `media_type` is kept as supplied; it is validated per dispatch.
    Media {
        media_url: String,
        media_type: String,
    },
}

impl DispatchPayload {
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text {
            message: message.into(),
        }
    }

    pub fn media(media_url: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::Media {
            media_url: media_url.into(),
            media_type: media_type.into(),
        }
    }

    pub fn kind(&self) -> DispatchKind {
        match self {
            Self::Text { .. } => DispatchKind::Text,
            Self::Media { .. } => DispatchKind::Media,
        }
    }

    fn content(&self) -> OutcomeContent {
        match self {
            Self::Text { .. } => OutcomeContent::Message,
            Self::Media { media_type, .. } => OutcomeContent::Media(media_type.clone()),
        }
    }

    /// Noun used in progress lines: `message` or the supplied media type.
    pub fn noun(&self) -> &str {
        match self {
            Self::Text { .. } => "message",
            Self::Media { media_type, .. } => media_type.as_str(),
        }
    }
}

pub async fn dispatch_one(
    client: &GatewayClient,
    instance: &str,
    recipient: &RecipientIdentifier,
    payload: &DispatchPayload,
    progress: &dyn DispatchProgressSink,
) -> DispatchOutcome {
    let display_recipient = recipient.to_string();
    let content = payload.content();
    progress.info(&format!(
        "Attempting to send {} to {display_recipient} using instance {instance}",
        payload.noun()
    ));

    let Some(canonical) = normalize_recipient(recipient) else {
        tracing::debug!(
            recipient = display_recipient.as_str(),
            "rejected invalid recipient"
        );
        return DispatchOutcome::Failure {
            recipient: display_recipient,
            content,
            reason: DispatchFailure::InvalidRecipient,
        };
    };

    let result = match payload {
        DispatchPayload::Text { message } => {
            client
                .send_text(instance, canonical.as_str(), message)
                .await
        }
        DispatchPayload::Media {
            media_url,
            media_type,
        } => {
            let Some(media_kind) = MediaKind::parse(media_type) else {
                tracing::debug!(
                    recipient = display_recipient.as_str(),
                    media_type = media_type.as_str(),
                    "rejected invalid media type"
                );
                return DispatchOutcome::Failure {
                    recipient: display_recipient,
                    content,
                    reason: DispatchFailure::InvalidMediaType,
                };
            };
            client
                .send_media(instance, canonical.as_str(), media_url, media_kind)
                .await
        }
    };

    match result {
        Ok(_) => DispatchOutcome::Success {
            recipient: display_recipient,
            content,
        },
        Err(error) => DispatchOutcome::Failure {
            recipient: display_recipient,
            content,
            reason: DispatchFailure::Gateway(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use relay_gateway::{GatewayClient, GatewayError};
    use serde_json::json;

    use super::{dispatch_one, DispatchPayload};
    use crate::outcome::{DispatchFailure, DispatchOutcome};
    use crate::progress::NoopProgressSink;
    use crate::recipient::RecipientIdentifier;
    use crate::test_support::{test_config, RecordingProgressSink, RecordingTransport};

    fn client_with(transport: Arc<RecordingTransport>) -> GatewayClient {
        GatewayClient::with_transport(test_config(), transport)
    }

    #[tokio::test]
    async fn functional_text_dispatch_sends_canonical_number() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());
        let outcome = dispatch_one(
            &client,
            "primary",
            &RecipientIdentifier::from("+55 (11) 99999-8888"),
            &DispatchPayload::text("hello"),
            &NoopProgressSink,
        )
        .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.recipient(), "+55 (11) 99999-8888");
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].endpoint,
            "https://gateway.test/message/sendText/primary"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({"number": "5511999998888", "text": "hello"}))
        );
    }

    #[tokio::test]
    async fn regression_invalid_recipient_never_reaches_gateway() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());
        for raw in ["abc", "119999988", ""] {
            let outcome = dispatch_one(
                &client,
                "primary",
                &RecipientIdentifier::from(raw),
                &DispatchPayload::text("hello"),
                &NoopProgressSink,
            )
            .await;
            assert_eq!(outcome.failure(), Some(&DispatchFailure::InvalidRecipient));
        }
        let outcome = dispatch_one(
            &client,
            "primary",
            &RecipientIdentifier::Integer(12345),
            &DispatchPayload::media("https://cdn.test/a.png", "image"),
            &NoopProgressSink,
        )
        .await;
        assert_eq!(outcome.failure(), Some(&DispatchFailure::InvalidRecipient));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn regression_invalid_media_type_never_reaches_gateway() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());
        for media_type in ["sticker", "", "gif", "imagem"] {
            let outcome = dispatch_one(
                &client,
                "primary",
                &RecipientIdentifier::from("5511999998888"),
                &DispatchPayload::media("https://cdn.test/a.png", media_type),
                &NoopProgressSink,
            )
            .await;
            assert_eq!(outcome.failure(), Some(&DispatchFailure::InvalidMediaType));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn functional_media_dispatch_accepts_any_case_and_labels_success() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport.clone());
        let outcome = dispatch_one(
            &client,
            "sales",
            &RecipientIdentifier::Integer(5511999998888),
            &DispatchPayload::media("https://cdn.test/a.png", "IMAGE"),
            &NoopProgressSink,
        )
        .await;

        assert_eq!(
            outcome.render(),
            "✅ Image sent successfully to 5511999998888."
        );
        let requests = transport.requests();
        assert_eq!(
            requests[0].endpoint,
            "https://gateway.test/message/sendMedia/sales"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "number": "5511999998888",
                "mediatype": "image",
                "media": "https://cdn.test/a.png"
            }))
        );
    }

    #[tokio::test]
    async fn functional_gateway_rejection_becomes_failure_outcome() {
        let transport = Arc::new(RecordingTransport::default().respond(
            "5511999998888",
            Some(500),
            "internal error",
        ));
        let client = client_with(transport);
        let outcome = dispatch_one(
            &client,
            "primary",
            &RecipientIdentifier::from("5511999998888"),
            &DispatchPayload::media("https://cdn.test/a.png", "IMAGE"),
            &NoopProgressSink,
        )
        .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Failure {
                recipient: "5511999998888".to_string(),
                content: crate::outcome::OutcomeContent::Media("IMAGE".to_string()),
                reason: DispatchFailure::Gateway(GatewayError::Rejected {
                    status: 500,
                    body: "internal error".to_string(),
                }),
            }
        );
        let line = outcome.render();
        assert!(line.contains("500"));
        assert!(line.contains("internal error"));
    }

    #[tokio::test]
    async fn functional_transport_failure_becomes_failure_outcome() {
        let transport = Arc::new(RecordingTransport::default().respond(
            "5511999998888",
            None,
            "dns lookup failed",
        ));
        let client = client_with(transport);
        let outcome = dispatch_one(
            &client,
            "primary",
            &RecipientIdentifier::from("5511999998888"),
            &DispatchPayload::text("hello"),
            &NoopProgressSink,
        )
        .await;
        assert_eq!(
            outcome.render(),
            "❌ Error sending message to 5511999998888: dns lookup failed"
        );
    }

    #[tokio::test]
    async fn unit_dispatch_reports_attempt_to_progress_sink() {
        let transport = Arc::new(RecordingTransport::default());
        let client = client_with(transport);
        let progress = RecordingProgressSink::default();
        dispatch_one(
            &client,
            "primary",
            &RecipientIdentifier::from("5511999998888"),
            &DispatchPayload::media("https://cdn.test/a.ogg", "audio"),
            &progress,
        )
        .await;
        assert_eq!(
            progress.lines(),
            vec!["Attempting to send audio to 5511999998888 using instance primary".to_string()]
        );
    }
}
