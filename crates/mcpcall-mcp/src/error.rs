//! Error types for MCP operations.

use mcpcall_types::{HttpError, ToolCallError};
use thiserror::Error;

/// Errors from talking to a remote MCP endpoint.
#[derive(Debug, Error)]
pub enum McpError {
    #[error(transparent)]
    ToolCall(#[from] ToolCallError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("JSON-RPC error from '{endpoint}' (code {code}): {message}")]
    JsonRpc {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("MCP protocol error: {0}")]
    Protocol(String),

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
