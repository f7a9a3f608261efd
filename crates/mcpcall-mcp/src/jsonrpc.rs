//! JSON-RPC 2.0 types for MCP communication.

use std::sync::atomic::{AtomicU64, Ordering};

use mcpcall_types::ToolCall;
use serde::{Deserialize, Deserializer, Serialize};

/// Id carried by every request under [`RequestIdPolicy::Fixed`].
pub const FIXED_REQUEST_ID: u64 = 1;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request.
    pub fn new(id: u64, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }

    /// Build a `tools/call` request for the given call params.
    pub fn tool_call(id: u64, call: &ToolCall) -> Result<Self, serde_json::Error> {
        let params = serde_json::to_value(call)?;
        Ok(Self::new(id, "tools/call", Some(params)))
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<u64>,
    /// `Some(Value::Null)` when the server sent `"result": null`.
    #[serde(default, deserialize_with = "present")]
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcError>,
}

/// Keep a present-but-null field as `Some(Null)`; only absence is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// How request ids are assigned on a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestIdPolicy {
    /// Every request uses [`FIXED_REQUEST_ID`].
    #[default]
    Fixed,
    /// Ids start at 1 and increase by one per request.
    Sequential,
}

/// Hands out request ids according to a [`RequestIdPolicy`].
#[derive(Debug)]
pub(crate) struct RequestIds {
    policy: RequestIdPolicy,
    next_id: AtomicU64,
}

impl RequestIds {
    pub(crate) fn new(policy: RequestIdPolicy) -> Self {
        Self {
            policy,
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn next(&self) -> u64 {
        match self.policy {
            RequestIdPolicy::Fixed => FIXED_REQUEST_ID,
            RequestIdPolicy::Sequential => self.next_id.fetch_add(1, Ordering::Relaxed),
        }
    }
}
