//! Gateway client building blocks for relay.
//!
//! Provides the gateway configuration value, the HTTP transport seam, media
//! kind parsing, and the client that issues send-text, send-media, and
//! connection-state requests against an Evolution-style messaging gateway.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use relay_gateway::{GatewayConfig, MediaKind};
//!
//! let config = GatewayConfig {
//!     base_url: "https://gateway.example.com/".to_string(),
//!     api_key: "secret".to_string(),
//!     default_instance: "sales".to_string(),
//! };
//! config.validate()?;
//! assert_eq!(config.resolve_instance(None), "sales");
//! assert_eq!(
//!     config.endpoint("message/sendText", "sales"),
//!     "https://gateway.example.com/message/sendText/sales"
//! );
//! assert_eq!(MediaKind::parse("IMAGE"), Some(MediaKind::Image));
//! # Ok(())
//! # }
//! ```

pub mod gateway_client;
pub mod gateway_config;
pub mod gateway_media;
pub mod gateway_transport;

pub use gateway_client::*;
pub use gateway_config::*;
pub use gateway_media::*;
pub use gateway_transport::*;
