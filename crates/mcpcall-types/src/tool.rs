//! Tool-call parameter types.

use serde::{Deserialize, Serialize};

use crate::ToolCallError;

/// Arguments passed to a remote tool: string keys to arbitrary JSON values.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// The `params` object of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

impl ToolCall {
    /// Build tool-call params. Missing arguments become an empty object.
    pub fn new(
        name: impl Into<String>,
        arguments: Option<ToolArguments>,
    ) -> Result<Self, ToolCallError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ToolCallError::EmptyName);
        }
        Ok(Self {
            name,
            arguments: arguments.unwrap_or_default(),
        })
    }
}
