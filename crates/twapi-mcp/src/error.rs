//! Error types for the MCP server

use serde_json::{Value, json};
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC 2.0 error codes used by the server
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown tool requested
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Missing or malformed tool arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A write operation was attempted without an active session
    #[error("Not logged in: must login first")]
    NotLoggedIn,

    /// The upstream API call failed
    #[error("{}", upstream_display(*status, message))]
    Upstream { status: Option<u16>, message: String },

    /// Startup configuration or client construction failed
    #[error("configuration error: {0}")]
    Client(#[from] twapi_client::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn upstream_display(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Twitter API error (HTTP {status}): {message}"),
        None => format!("Twitter API error: {message}"),
    }
}

impl Error {
    /// Shorthand for [`Error::InvalidArguments`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Wrap a failed upstream call, keeping its status and message.
    pub fn upstream(err: twapi_client::Error) -> Self {
        Self::Upstream {
            status: err.status(),
            message: err.message(),
        }
    }

    /// JSON-RPC error code this error is reported with.
    pub fn code(&self) -> i32 {
        match self {
            Self::UnknownTool(_) => codes::METHOD_NOT_FOUND,
            Self::InvalidArguments { .. } => codes::INVALID_PARAMS,
            Self::NotLoggedIn => codes::INVALID_REQUEST,
            Self::Upstream { .. } | Self::Client(_) | Self::Json(_) | Self::Io(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Optional structured `data` for the JSON-RPC error object.
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::Upstream {
                status: Some(status),
                ..
            } => Some(json!({ "status": status })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::UnknownTool("delete_tweet".into()), -32601)]
    #[case(Error::invalid("missing query"), -32602)]
    #[case(Error::NotLoggedIn, -32600)]
    #[case(Error::Upstream { status: Some(500), message: "boom".into() }, -32603)]
    fn errors_map_to_jsonrpc_codes(#[case] err: Error, #[case] code: i32) {
        assert_eq!(err.code(), code);
    }

    #[test]
    fn unknown_tool_message_names_the_tool() {
        assert_eq!(
            Error::UnknownTool("delete_tweet".into()).to_string(),
            "Unknown tool: delete_tweet"
        );
    }

    #[test]
    fn upstream_error_carries_status() {
        let err = Error::upstream(twapi_client::Error::Api {
            status: 404,
            message: "User not found".into(),
        });
        assert_eq!(err.to_string(), "Twitter API error (HTTP 404): User not found");
        assert_eq!(err.data(), Some(json!({"status": 404})));

        let no_status = Error::Upstream {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(no_status.to_string(), "Twitter API error: connection refused");
        assert_eq!(no_status.data(), None);
    }
}
