//! Upstream client configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Base URL of the twitterapi.io REST surface
pub const DEFAULT_BASE_URL: &str = "https://api.twitterapi.io/twitter";

/// Outbound request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`UpstreamClient`](crate::UpstreamClient).
///
/// Every field has a default, so a TOML file may set any subset:
///
/// ```toml
/// api_key = "..."
/// base_url = "https://api.twitterapi.io/twitter"
/// timeout_secs = 30
/// proxy = "http://127.0.0.1:8080"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Sent as `x-api-key` when non-empty
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(
        default = "default_timeout",
        rename = "timeout_secs",
        with = "duration_secs"
    )]
    pub timeout: Duration,

    /// Explicit proxy for every upstream call; overrides the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout: default_timeout(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given key and default everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Check that the URLs parse and the timeout is usable.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url).map_err(|e| Error::InvalidConfig {
            message: format!("base_url '{}' is not a valid URL: {}", self.base_url, e),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig {
                message: format!("base_url must be http or https, got '{}'", base.scheme()),
            });
        }

        if let Some(proxy) = &self.proxy {
            Url::parse(proxy).map_err(|e| Error::InvalidConfig {
                message: format!("proxy '{}' is not a valid URL: {}", proxy, e),
            })?;
        }

        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
