//! Frontend configuration

use portal_core::ClientConfig;
use portal_core::config::DEFAULT_API_BASE_URL;

/// Browser builds take their settings at compile time
pub struct FrontendConfig;

impl FrontendConfig {
    /// Baked-in API base URL, `PORTAL_API_BASE_URL` at build time
    pub const API_BASE_URL: Option<&'static str> = option_env!("PORTAL_API_BASE_URL");

    /// Baked-in switch for dropping the session on HTTP 401
    pub const CLEAR_SESSION_ON_UNAUTHORIZED: Option<&'static str> =
        option_env!("PORTAL_CLEAR_SESSION_ON_UNAUTHORIZED");

    pub fn api_base_url() -> &'static str {
        match Self::API_BASE_URL {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_API_BASE_URL,
        }
    }

    pub fn client_config() -> ClientConfig {
        let clear_session_on_unauthorized = matches!(
            Self::CLEAR_SESSION_ON_UNAUTHORIZED,
            Some("1" | "true" | "TRUE" | "yes")
        );
        ClientConfig {
            clear_session_on_unauthorized,
            ..ClientConfig::default().with_base_url(Self::api_base_url())
        }
    }
}
