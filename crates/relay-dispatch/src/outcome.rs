//! Per-recipient dispatch outcomes.
//!
//! Outcomes stay tagged until the display boundary. Batch tallies read the
//! tag, never the rendered line.

use std::fmt;

use relay_gateway::{GatewayError, MediaKind};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What was being sent, as named in outcome lines.
pub enum OutcomeContent {
    Message,
    /// Media type exactly as the caller supplied it.
    Media(String),
}

impl OutcomeContent {
    fn noun(&self) -> String {
        match self {
            Self::Message => "message".to_string(),
            Self::Media(media_type) => media_type.clone(),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Message => "Message".to_string(),
            Self::Media(media_type) => capitalize(media_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    InvalidRecipient,
    InvalidMediaType,
    Gateway(GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one dispatch attempt. `recipient` is the identifier as supplied.
pub enum DispatchOutcome {
    Success {
        recipient: String,
        content: OutcomeContent,
    },
    Failure {
        recipient: String,
        content: OutcomeContent,
        reason: DispatchFailure,
    },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Success { recipient, .. } | Self::Failure { recipient, .. } => recipient,
        }
    }

    pub fn failure(&self) -> Option<&DispatchFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { recipient, content } => {
                write!(f, "✅ {} sent successfully to {recipient}.", content.label())
            }
            Self::Failure {
                recipient,
                content,
                reason,
            } => match reason {
                DispatchFailure::InvalidRecipient => write!(
                    f,
                    "❌ Invalid phone number '{recipient}'. Include the country code and area code."
                ),
                DispatchFailure::InvalidMediaType => write!(
                    f,
                    "❌ Invalid media type '{}' for {recipient}. Must be one of: {}",
                    content.noun(),
                    MediaKind::supported_list()
                ),
                DispatchFailure::Gateway(GatewayError::Rejected { status, body }) => write!(
                    f,
                    "❌ Failed to send {} to {recipient}. Status code: {status}. Error: {body}",
                    content.noun()
                ),
                DispatchFailure::Gateway(GatewayError::Transport { detail }) => write!(
                    f,
                    "❌ Error sending {} to {recipient}: {detail}",
                    content.noun()
                ),
                DispatchFailure::Gateway(error @ GatewayError::MalformedBody { .. }) => write!(
                    f,
                    "❌ Error sending {} to {recipient}: {error}",
                    content.noun()
                ),
            },
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
