//! Client configuration
//!
//! Values are layered defaults → optional file → `PORTAL_*` environment
//! variables, e.g. `PORTAL_API_BASE_URL=https://portal.example.com`.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Backend address used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PORTAL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub api_base_url: String,
    /// Request timeout; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
    /// Drop the stored session when an authenticated call returns 401
    pub clear_session_on_unauthorized: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
            clear_session_on_unauthorized: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration with defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed or the
    /// resulting base URL is invalid
    pub fn from_env() -> CoreResult<Self> {
        Self::load(None::<&Path>)
    }

    /// Load configuration from an optional file, then apply environment
    /// overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the resulting
    /// base URL is invalid
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default(
                "clear_session_on_unauthorized",
                defaults.clear_session_on_unauthorized,
            )?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, keeping other settings
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Check that the base URL is an absolute http(s) URL
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the problem
    pub fn validate(&self) -> CoreResult<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            CoreError::invalid_config(format!(
                "api_base_url '{}' is not a valid URL: {e}",
                self.api_base_url
            ))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CoreError::invalid_config(format!(
                "api_base_url must use http or https, got '{other}'"
            ))),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), None);
        assert!(!config.clear_session_on_unauthorized);
        config.validate().unwrap();
    }

    #[test]
    fn loads_values_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://portal.example.com\"\ntimeout_secs = 30\nclear_session_on_unauthorized = true\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_base_url, "https://portal.example.com");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.clear_session_on_unauthorized);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.yaml");
        std::fs::write(&path, "timeout_secs: 5\n").unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, Some(5));
        assert!(!config.clear_session_on_unauthorized);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(ClientConfig::default().with_base_url("/api").validate().is_err());
        assert!(
            ClientConfig::default()
                .with_base_url("ftp://example.com")
                .validate()
                .is_err()
        );
        assert!(
            ClientConfig::default()
                .with_base_url("https://example.com/prefix/")
                .validate()
                .is_ok()
        );
    }
}
