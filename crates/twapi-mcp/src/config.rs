//! Startup configuration resolution
//!
//! Layers, highest precedence first: explicit overrides (CLI flags or their
//! environment variables), an optional TOML file, built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use twapi_client::ClientConfig;

use crate::Result;

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub proxy: Option<String>,
}

/// Build the upstream configuration from all layers and validate it.
///
/// A missing API key only produces a warning; calls still go out and the
/// upstream decides whether to accept them.
pub fn resolve(overrides: &ConfigOverrides) -> Result<ClientConfig> {
    let mut config = match &overrides.config_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config file");
            ClientConfig::from_toml_file(path)?
        }
        None => ClientConfig::default(),
    };

    if let Some(api_key) = &overrides.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(base_url) = &overrides.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = overrides.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(proxy) = &overrides.proxy {
        config.proxy = Some(proxy.clone()).filter(|p| !p.trim().is_empty());
    }

    config.validate()?;

    if !config.has_api_key() {
        tracing::warn!(
            "No API key configured (set TWITTERAPI_API_KEY); upstream calls will likely be rejected"
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_any_layer() {
        let config = resolve(&ConfigOverrides::default()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn overrides_win_over_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("twapi.toml");
        fs::write(
            &path,
            "api_key = \"from-file\"\nbase_url = \"http://file.local\"\ntimeout_secs = 7\n",
        )
        .unwrap();

        let config = resolve(&ConfigOverrides {
            config_file: Some(path),
            api_key: Some("from-env".to_string()),
            ..ConfigOverrides::default()
        })
        .unwrap();

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.base_url, "http://file.local");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn empty_proxy_override_clears_proxy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("twapi.toml");
        fs::write(&path, "proxy = \"http://127.0.0.1:3128\"\n").unwrap();

        let config = resolve(&ConfigOverrides {
            config_file: Some(path),
            proxy: Some(String::new()),
            ..ConfigOverrides::default()
        })
        .unwrap();
        assert!(config.proxy.is_none());
    }

    #[test]
    fn invalid_values_fail_at_startup() {
        let err = resolve(&ConfigOverrides {
            base_url: Some("::::".to_string()),
            ..ConfigOverrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Client(_)));

        assert!(
            resolve(&ConfigOverrides {
                timeout_secs: Some(0),
                ..ConfigOverrides::default()
            })
            .is_err()
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = resolve(&ConfigOverrides {
            config_file: Some(temp.path().join("nope.toml")),
            ..ConfigOverrides::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
