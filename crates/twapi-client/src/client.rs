//! HTTP execution against the upstream REST API

use reqwest::header::{COOKIE, HeaderValue};
use reqwest::{Client, Proxy};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::request::{HttpMethod, UpstreamRequest};
use crate::{Error, Result};

/// Header carrying the twitterapi.io API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// A 2xx upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Parsed JSON body; a non-JSON body is kept as a JSON string and an
    /// empty body becomes `null`
    pub body: Value,
}

/// Thin async client for the upstream API.
///
/// Sends `x-api-key` and `Cookie` headers when the request carries them.
/// Does not retry.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    ///
    /// Only transport settings are taken from `config`; credentials travel
    /// on each [`UpstreamRequest`].
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        if config.has_api_key() {
            sensitive_header(config.api_key.trim(), "api_key")?;
        }

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("twapi-mcp/{}", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and return the parsed body of a 2xx response.
    ///
    /// Non-2xx responses become [`Error::Api`] carrying the status and the
    /// message extracted from the error body; transport failures (including
    /// the timeout) become [`Error::Http`].
    pub async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "Calling upstream API");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(api_key) = &request.api_key {
            builder = builder.header(API_KEY_HEADER, sensitive_header(api_key.trim(), "api_key")?);
        }
        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, sensitive_header(cookie, "session cookie")?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&text)
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                %message,
                "Upstream API returned an error"
            );
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body: parse_body(&text),
        })
    }
}

/// Whether `value` can be sent as an HTTP header value.
pub fn is_header_safe(value: &str) -> bool {
    HeaderValue::from_str(value).is_ok()
}

fn sensitive_header(value: &str, what: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
        message: format!("{what} contains characters not allowed in a header"),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Pull a human-readable message out of an upstream error body.
///
/// Looks for `message`, `msg`, `error` and `detail` string fields (also
/// `error.message`), falling back to the trimmed raw text. Returns `None`
/// for an empty body.
pub fn extract_error_message(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "msg", "error", "detail"] {
            match map.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(s)) = inner.get("message") {
                        return Some(s.clone());
                    }
                }
                _ => {}
            }
        }
    }

    Some(trimmed.to_string())
}
