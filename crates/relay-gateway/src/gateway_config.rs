//! Process-wide gateway configuration.
//!
//! The configuration is read once at startup and passed by value into the
//! gateway client. It is never mutated afterwards, so concurrent dispatches
//! can share it freely.

use anyhow::{bail, Result};

pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_GATEWAY_INSTANCE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Connection settings for the messaging gateway.
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_instance: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
            api_key: String::new(),
            default_instance: DEFAULT_GATEWAY_INSTANCE.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Rejects configurations that would make every request fail.
    ///
    /// Callers run this once at startup so a missing API key surfaces as a
    /// single startup error instead of one failure line per recipient.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("gateway api key must be non-empty (set API_KEY or --gateway-api-key)");
        }
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            bail!("gateway base url must be non-empty (set BASE_API_URL or --gateway-base-url)");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!(
                "gateway base url '{}' must start with http:// or https://",
                self.base_url
            );
        }
        if self.default_instance.trim().is_empty() {
            bail!("default gateway instance must be non-empty (set DEFAULT_INSTANCE or --default-instance)");
        }
        Ok(())
    }

    /// Returns the caller's instance, or the configured default when the
    /// caller omitted it or passed a blank name.
    pub fn resolve_instance(&self, instance: Option<&str>) -> String {
        match instance.map(str::trim).filter(|value| !value.is_empty()) {
            Some(instance) => instance.to_string(),
            None => self.default_instance.trim().to_string(),
        }
    }

    pub fn endpoint(&self, route: &str, instance: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            route.trim_matches('/'),
            percent_encode_path_segment(instance)
        )
    }
}

fn percent_encode_path_segment(value: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut encoded = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        let is_unreserved = matches!(
            byte,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~'
        );
        if is_unreserved {
            encoded.push(*byte as char);
        } else {
            encoded.push('%');
            encoded.push(HEX[(byte >> 4) as usize] as char);
            encoded.push(HEX[(byte & 0x0F) as usize] as char);
        }
    }
    encoded
}
