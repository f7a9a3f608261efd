//! HTTP transport for MCP endpoint communication.
//!
//! Each request is a single POST (or GET for health checks) awaited to
//! completion. The response body is decoded as JSON and returned as-is;
//! whether a non-2xx status is an error depends on the [`StatusPolicy`].

use std::time::Duration;

use mcpcall_types::HttpError;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::config::{AuthScheme, EndpointConfig};
use crate::error::McpError;
use crate::jsonrpc::JsonRpcRequest;

/// Longest slice of an undecodable body kept in error messages.
const SNIPPET_CHARS: usize = 200;

/// How a non-2xx response is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusPolicy {
    /// Every non-2xx status is a typed `HttpError`.
    Strict,
    /// A JSON body is returned whatever the status; only non-JSON error
    /// bodies become a typed `HttpError`.
    AnyJson,
}

/// Async HTTP transport bound to one endpoint URL.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    http: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl HttpTransport {
    pub(crate) fn new(config: &EndpointConfig) -> Result<Self, McpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder
            .build()
            .map_err(|e| HttpError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url.clone(),
            headers: build_headers(config)?,
        })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    /// POST a JSON-RPC request and return the decoded response body.
    pub(crate) async fn post(
        &self,
        request: &JsonRpcRequest,
        statuses: StatusPolicy,
    ) -> Result<serde_json::Value, McpError> {
        let body = serde_json::to_vec(request)?;
        tracing::debug!(
            method = %request.method,
            id = request.id,
            "POST {}",
            self.url
        );

        let mut headers = self.headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .post(&self.url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(network_error)?;

        Ok(read_json(response, &self.url, statuses).await?)
    }

    /// GET the endpoint URL and return the decoded response body.
    pub(crate) async fn get(&self) -> Result<serde_json::Value, McpError> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(network_error)?;

        Ok(read_json(response, &self.url, StatusPolicy::Strict).await?)
    }
}

/// Headers sent with every request: accept, auth, and configured extras.
fn build_headers(config: &EndpointConfig) -> Result<HeaderMap, McpError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| McpError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        headers.insert(header_name, header_value(name, value)?);
    }

    if let Some(key) = &config.api_key {
        let (name, raw) = match config.auth_scheme {
            AuthScheme::ApiKey => (HeaderName::from_static("x-api-key"), key.clone()),
            AuthScheme::Bearer => (AUTHORIZATION, format!("Bearer {key}")),
        };
        let mut value = header_value(name.as_str(), &raw)?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, McpError> {
    HeaderValue::from_str(value).map_err(|e| McpError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn network_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Network(e.to_string())
    }
}

async fn read_json(
    response: reqwest::Response,
    url: &str,
    statuses: StatusPolicy,
) -> Result<serde_json::Value, HttpError> {
    let status = response.status();
    let text = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        if statuses == StatusPolicy::AnyJson {
            if let Ok(value) = serde_json::from_str(&text) {
                tracing::debug!(status = status.as_u16(), "returning JSON body of error response");
                return Ok(value);
            }
        }
        return Err(classify_error(status.as_u16(), &text, url));
    }

    serde_json::from_str(&text).map_err(|e| HttpError::Decode {
        message: e.to_string(),
        snippet: snippet(&text),
    })
}

/// Classify a non-2xx response into a typed HttpError.
fn classify_error(status: u16, body: &str, url: &str) -> HttpError {
    let message = error_message(body);
    match status {
        401 | 403 => HttpError::Auth { status, message },
        400 => HttpError::BadRequest { message },
        404 => HttpError::NotFound {
            url: url.to_string(),
        },
        429 => HttpError::RateLimited { message },
        _ => HttpError::Status { status, message },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"error": {"message": "..."}}`,
/// `{"error": "..."}` and `{"message": "..."}`; anything else is returned
/// as a trimmed snippet of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let found = value
            .get("detail")
            .and_then(|d| d.as_str())
            .or_else(|| value.pointer("/error/message").and_then(|m| m.as_str()))
            .or_else(|| value.get("error").and_then(|e| e.as_str()))
            .or_else(|| value.get("message").and_then(|m| m.as_str()));
        if let Some(message) = found {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(empty body)".to_string()
    } else {
        snippet(trimmed)
    }
}

fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
