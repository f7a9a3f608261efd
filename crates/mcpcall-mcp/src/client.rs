//! MCP client for one HTTP endpoint.
//!
//! `call_tool` is the plain helper: build the `tools/call` envelope, POST it,
//! and return whatever JSON came back. The remaining methods issue the other
//! single-request operations (`initialize`, `tools/list`, health GET) and
//! decode their results.

use std::sync::Arc;

use mcpcall_types::{ToolArguments, ToolCall};
use serde::Deserialize;

use crate::config::EndpointConfig;
use crate::error::McpError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RequestIds};
use crate::transport::{HttpTransport, StatusPolicy};

/// MCP protocol version sent in `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Information about a tool exposed by an MCP server.
#[derive(Debug, Clone)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result of calling a tool on an MCP server.
#[derive(Debug, Clone)]
pub struct McpToolResult {
    pub content: Vec<McpToolContent>,
    pub is_error: bool,
}

impl McpToolResult {
    /// All text content items, joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                McpToolContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content item in a tool result.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum McpToolContent {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    #[serde(other)]
    Other,
}

/// What the server reported in its `initialize` response.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub protocol_version: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub capabilities: serde_json::Value,
}

/// Client for a single MCP endpoint.
#[derive(Debug, Clone)]
pub struct McpClient {
    transport: HttpTransport,
    ids: Arc<RequestIds>,
}

/// Deserialization helpers for MCP protocol messages.
#[derive(Deserialize)]
struct ToolsListResult {
    tools: Vec<ToolEntry>,
}

#[derive(Deserialize)]
struct ToolEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_schema", rename = "inputSchema")]
    input_schema: serde_json::Value,
}

fn default_schema() -> serde_json::Value {
    serde_json::json!({"type": "object", "properties": {}})
}

#[derive(Deserialize)]
struct ToolCallResult {
    #[serde(default)]
    content: Vec<McpToolContent>,
    #[serde(default, rename = "isError")]
    is_error: bool,
}

#[derive(Deserialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(default, rename = "serverInfo")]
    server_info: Option<ServerInfoEntry>,
    #[serde(default)]
    capabilities: serde_json::Value,
}

#[derive(Deserialize)]
struct ServerInfoEntry {
    name: Option<String>,
    version: Option<String>,
}

impl McpClient {
    /// Create a client for the configured endpoint. No request is sent.
    pub fn new(config: &EndpointConfig) -> Result<Self, McpError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            ids: Arc::new(RequestIds::new(config.request_ids)),
        })
    }

    /// The endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.transport.url()
    }

    /// Call a tool and return the response body exactly as received.
    ///
    /// A JSON-RPC error object is not treated as a failure here; it is part
    /// of the returned value, whatever the HTTP status. Only a network
    /// failure or a body that is not JSON produces an `Err`.
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Option<ToolArguments>,
    ) -> Result<serde_json::Value, McpError> {
        let call = ToolCall::new(tool_name, arguments)?;
        let request = JsonRpcRequest::tool_call(self.ids.next(), &call)?;
        self.transport.post(&request, StatusPolicy::AnyJson).await
    }

    /// Call a tool and decode the MCP tool result.
    ///
    /// JSON-RPC errors become `McpError::JsonRpc`.
    pub async fn call_tool_checked(
        &self,
        tool_name: &str,
        arguments: Option<ToolArguments>,
    ) -> Result<McpToolResult, McpError> {
        let call = ToolCall::new(tool_name, arguments)?;
        let request = JsonRpcRequest::tool_call(self.ids.next(), &call)?;
        let result = self.send_checked(request).await?;

        let call_result: ToolCallResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("Failed to parse tools/call result: {e}")))?;

        Ok(McpToolResult {
            content: call_result.content,
            is_error: call_result.is_error,
        })
    }

    /// Send `initialize` and report the server's protocol version and identity.
    pub async fn initialize(&self) -> Result<ServerInfo, McpError> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "mcpcall",
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        let request = JsonRpcRequest::new(self.ids.next(), "initialize", Some(params));
        let result = self.send_checked(request).await?;

        let init: InitializeResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("Failed to parse initialize result: {e}")))?;
        let (name, version) = match init.server_info {
            Some(info) => (info.name, info.version),
            None => (None, None),
        };

        Ok(ServerInfo {
            protocol_version: init.protocol_version,
            name,
            version,
            capabilities: init.capabilities,
        })
    }

    /// Discover the tools the server exposes via `tools/list`.
    pub async fn list_tools(&self) -> Result<Vec<McpToolInfo>, McpError> {
        let request =
            JsonRpcRequest::new(self.ids.next(), "tools/list", Some(serde_json::json!({})));
        let result = self.send_checked(request).await?;

        let list: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("Failed to parse tools/list response: {e}")))?;

        let tools: Vec<McpToolInfo> = list
            .tools
            .into_iter()
            .map(|t| McpToolInfo {
                name: t.name,
                description: t.description.unwrap_or_default(),
                input_schema: t.input_schema,
            })
            .collect();

        tracing::info!("MCP endpoint '{}' lists {} tools", self.endpoint(), tools.len());
        Ok(tools)
    }

    /// GET the endpoint URL; MCP servers commonly answer with a status document.
    pub async fn health(&self) -> Result<serde_json::Value, McpError> {
        self.transport.get().await
    }

    /// POST a request and unwrap its `result`, mapping JSON-RPC errors.
    async fn send_checked(&self, request: JsonRpcRequest) -> Result<serde_json::Value, McpError> {
        let method = request.method.clone();
        let body = self.transport.post(&request, StatusPolicy::Strict).await?;

        let resp: JsonRpcResponse = serde_json::from_value(body)
            .map_err(|e| McpError::Protocol(format!("Malformed {method} response: {e}")))?;

        if resp.id.is_some_and(|id| id != request.id) {
            tracing::warn!(
                "{method} response id {:?} does not match request id {}",
                resp.id,
                request.id
            );
        }

        if let Some(err) = resp.error {
            return Err(McpError::JsonRpc {
                endpoint: self.endpoint().to_string(),
                code: err.code,
                message: err.message,
            });
        }

        resp.result.ok_or_else(|| {
            McpError::Protocol(format!("{method} response has neither result nor error"))
        })
    }
}
