//! Error hierarchy for mcpcall.

use thiserror::Error;

/// Errors from the HTTP exchange with an MCP endpoint.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Endpoint not found: {url}")]
    NotFound { url: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Response body is not valid JSON: {message} (body: {snippet})")]
    Decode { message: String, snippet: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,
}

/// Errors from building a `tools/call` request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Tool name must not be empty")]
    EmptyName,
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown endpoint '{name}' (not defined in {path})")]
    UnknownEndpoint { name: String, path: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
