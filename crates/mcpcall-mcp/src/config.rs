//! Configuration types for MCP endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::jsonrpc::RequestIdPolicy;

/// How the API key is presented to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `X-API-Key: <key>`
    #[default]
    ApiKey,
    /// `Authorization: Bearer <key>`
    Bearer,
}

/// Configuration for a single MCP endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full URL requests are POSTed to (e.g. "https://host/mcp").
    pub url: String,
    /// API key sent with every request, if set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request timeout in milliseconds. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub request_ids: RequestIdPolicy,
}

impl EndpointConfig {
    /// An unauthenticated endpoint with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            auth_scheme: AuthScheme::default(),
            headers: BTreeMap::new(),
            timeout_ms: None,
            request_ids: RequestIdPolicy::default(),
        }
    }
}
