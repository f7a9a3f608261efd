//! MCP client for remote tool endpoints served over HTTP.
//!
//! Every operation is a single JSON-RPC 2.0 request POSTed to one endpoint
//! URL, awaited to completion. There is no session handshake to perform
//! first: `tools/call` can be issued straight away, and the raw JSON body
//! the server returns is handed back unchanged.

pub mod client;
pub mod config;
pub mod error;
pub mod jsonrpc;
mod transport;

pub use client::{McpClient, McpToolContent, McpToolInfo, McpToolResult, ServerInfo};
pub use config::{AuthScheme, EndpointConfig};
pub use error::McpError;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestIdPolicy};
