//! Recipient identifier normalization.
//!
//! The 10-digit floor is a country-agnostic heuristic, not full phone number
//! validation; it only guarantees a country code plus area code are likely
//! present before a number reaches the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_RECIPIENT_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Recipient as supplied by the caller: free text or an integer.
pub enum RecipientIdentifier {
    Integer(i64),
    Text(String),
}

impl fmt::Display for RecipientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for RecipientIdentifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecipientIdentifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RecipientIdentifier {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Digit-only recipient with at least `MIN_RECIPIENT_DIGITS` digits.
pub struct CanonicalRecipient(String);

impl CanonicalRecipient {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips every non-digit character; `None` when fewer than
/// `MIN_RECIPIENT_DIGITS` digits remain.
pub fn normalize_recipient(identifier: &RecipientIdentifier) -> Option<CanonicalRecipient> {
    let digits = identifier
        .to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    if digits.len() < MIN_RECIPIENT_DIGITS {
        return None;
    }
    Some(CanonicalRecipient(digits))
}
