//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when neither `API_URL` nor `NEXT_PUBLIC_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Fixed request timeout unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub api_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Route the user is sent to when the session cannot be recovered
    pub login_path: String,
    /// Where the CLI persists the token pair
    pub token_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_path: "/login".to_string(),
            token_file: default_token_file(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("API_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_URL"))
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("API_TIMEOUT_SECS", raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            api_url: normalize_base_url(&api_url)?,
            timeout: Duration::from_secs(timeout_secs),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            token_file: env::var("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_file()),
        };

        tracing::debug!(api_url = %config.api_url, "Configuration loaded");
        Ok(config)
    }

    /// Config pointing at a specific server, used by tests and embedders.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Validate a base URL and strip any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed =
        reqwest::Url::parse(raw).map_err(|_| ConfigError::Invalid("API_URL", raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("API_URL", raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn default_token_file() -> PathBuf {
    directories::ProjectDirs::from("", "", "stemlab")
        .map(|dirs| dirs.config_dir().join("tokens.json"))
        .unwrap_or_else(|| PathBuf::from(".stemlab-tokens.json"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("API_URL", "https://api.example.com/api/");
        env::set_var("API_TIMEOUT_SECS", "12");
        env::set_var("TOKEN_FILE", "/tmp/stemlab-test-tokens.json");

        let config = ClientConfig::from_env().expect("Config should load");

        assert_eq!(config.api_url, "https://api.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.login_path, "/login");
        assert_eq!(
            config.token_file,
            PathBuf::from("/tmp/stemlab-test-tokens.json")
        );

        env::remove_var("API_URL");
        env::remove_var("API_TIMEOUT_SECS");
        env::remove_var("TOKEN_FILE");
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert_eq!(
            normalize_base_url("http://localhost:5000/api/").unwrap(),
            "http://localhost:5000/api"
        );
    }
}
