//! Error types for twapi-client

use std::path::PathBuf;

/// Result type for twapi-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or talking to the upstream API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connect, timeout, malformed request)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("upstream API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Configuration value could not be used
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// HTTP status reported by the upstream, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message without the variant prefix.
    ///
    /// For [`Error::Api`] this is the text extracted from the upstream error
    /// body; for transport failures it is the `reqwest` description.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) if e.is_timeout() => format!("request timed out: {e}"),
            Self::Http(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
