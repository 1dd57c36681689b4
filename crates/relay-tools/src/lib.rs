//! MCP tool surface for relay.
//!
//! Serves the dispatch operations as Model Context Protocol tools over
//! newline-delimited JSON-RPC 2.0 on stdin/stdout. A session handles one
//! request at a time, so a paced batch tool call delays later requests on the
//! same session until it finishes.

pub mod mcp_server_runtime;
pub mod mcp_tool_catalog;

pub use mcp_server_runtime::*;
pub use mcp_tool_catalog::*;
