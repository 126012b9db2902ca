//! CLI configuration utilities

use anyhow::{Context as _, Result};
use portal_core::ClientConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment override for the data directory
pub const STATE_DIR_ENV: &str = "PORTAL_STATE_DIR";

/// Config file picked up from the data directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// `--data-dir`, then `PORTAL_STATE_DIR`, then the platform data dir
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    data_dir_from(flag, std::env::var_os(STATE_DIR_ENV).map(PathBuf::from))
}

fn data_dir_from(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env).unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("portal")
    })
}

/// Load client configuration: file, then `PORTAL_*` env, then `--api-url`
pub fn load_client_config(
    explicit: Option<&Path>,
    data_dir: &Path,
    api_url: Option<String>,
) -> Result<ClientConfig> {
    let path = explicit.map(Path::to_path_buf).or_else(|| {
        let candidate = data_dir.join(DEFAULT_CONFIG_FILE);
        candidate.exists().then_some(candidate)
    });
    if let Some(path) = &path {
        info!("Loading client configuration from: {:?}", path);
    }

    let mut config = ClientConfig::load(path.as_deref())
        .with_context(|| "Failed to load client configuration")?;
    if let Some(url) = api_url {
        config = config.with_base_url(url);
        config.validate()?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env() {
        let dir = data_dir_from(Some("/flag".into()), Some("/env".into()));
        assert_eq!(dir, PathBuf::from("/flag"));
    }

    #[test]
    fn env_beats_platform_default() {
        assert_eq!(data_dir_from(None, Some("/env".into())), PathBuf::from("/env"));
    }

    #[test]
    fn default_ends_in_portal() {
        assert!(data_dir_from(None, None).ends_with("portal"));
    }

    #[test]
    fn api_url_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "api_base_url = \"http://from-file:8000\"\n",
        )
        .unwrap();

        let from_file = load_client_config(None, dir.path(), None).unwrap();
        assert_eq!(from_file.api_base_url, "http://from-file:8000");

        let overridden =
            load_client_config(None, dir.path(), Some("https://api.test".into())).unwrap();
        assert_eq!(overridden.api_base_url, "https://api.test");
    }

    #[test]
    fn invalid_api_url_flag_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_client_config(None, dir.path(), Some("not a url".into())).is_err());
    }
}
