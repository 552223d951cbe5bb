//! Client configuration for the analysis service.
//!
//! Supports reading `~/.config/ai-opportunity-scanner/config.toml`, falling
//! back to environment variables and then built-in defaults.

use scanner_core::error::{Result, ScannerError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;

pub const ENV_API_URL: &str = "SCANNER_API_URL";
pub const ENV_MAX_RETRIES: &str = "SCANNER_MAX_RETRIES";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SCANNER_REQUEST_TIMEOUT_SECS";

/// Connection settings for [`HttpAnalysisClient`](crate::HttpAnalysisClient).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the analysis service, without a trailing slash.
    pub api_base_url: String,
    /// Automatic retries for network and server failures.
    pub max_retries: u32,
    /// Delay before the first automatic retry; doubled on each further one.
    pub initial_backoff_ms: u64,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration.
    ///
    /// Priority:
    /// 1. config.toml
    /// 2. Environment variables (SCANNER_API_URL, SCANNER_MAX_RETRIES, SCANNER_REQUEST_TIMEOUT_SECS)
    ///
    /// Missing values fall back to the defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path()
            && path.exists()
        {
            tracing::debug!("Loading client config from {}", path.display());
            return Self::from_file(&path);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScannerError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Builds a config from a variable lookup (normally the process environment).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = url;
        }
        if let Some(value) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_var(ENV_MAX_RETRIES, &value)?;
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = Some(parse_var(ENV_REQUEST_TIMEOUT_SECS, &value)?);
        }

        Ok(config.normalized())
    }

    /// Overrides the base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self.normalized()
    }

    /// Overrides the number of automatic retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the initial retry backoff.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Full URL of an API path such as `/api/analyze`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.api_base_url = trimmed;
        self
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScannerError::config(format!("Invalid value for {}: '{}'", key, value)))
}

/// Returns the path to the configuration file: ~/.config/ai-opportunity-scanner/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("ai-opportunity-scanner")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint("/api/analyze"), "http://localhost:8000/api/analyze");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_env_overrides_and_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://scanner.example.com/"),
            (ENV_MAX_RETRIES, "5"),
            (ENV_REQUEST_TIMEOUT_SECS, "90"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://scanner.example.com");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_MAX_RETRIES, "many")])).unwrap_err();
        assert!(matches!(err, ScannerError::Config(_)));
    }

    #[test]
    fn test_from_file_partial_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_base_url = \"http://10.0.0.5:8000/\"\nmax_retries = 0\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.initial_backoff_ms, 500);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "max_retries = \"two\"").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ScannerError::Serialization { .. }));
    }
}
