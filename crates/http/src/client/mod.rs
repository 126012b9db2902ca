//! Portal HTTP client
//!
//! Methods here return [`ClientError`] on any failure. The normalized
//! `{data, error}` view lives in [`crate::service`].

pub mod admin;
pub mod auth;
pub mod chatbot;
pub mod companies;
pub mod error;
pub mod generic;

pub use error::{ClientError, ErrorResponse};

use portal_core::{ClientConfig, SessionStore};
use reqwest::{Client, ClientBuilder, Method, header};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("portal-client/", env!("CARGO_PKG_VERSION"));

/// Portal API client.
///
/// Reads the bearer token from its [`SessionStore`] on every request, so a
/// login through one clone is visible to all others.
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    session: SessionStore,
    clear_session_on_unauthorized: bool,
}

impl PortalClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).session(session).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig, session: SessionStore) -> Result<Self, ClientError> {
        config
            .validate()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let mut builder = Self::builder()
            .base_url(&config.api_base_url)
            .session(session)
            .clear_session_on_unauthorized(config.clear_session_on_unauthorized);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Request builder for endpoints that never carry credentials
    pub fn public_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Request builder with `Authorization: Bearer` attached iff a token is
    /// stored at call time
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.public_request(method, path);
        match self.session.token() {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        self.send(request.build()?).await
    }

    /// Execute a request made with [`Self::request`], applying the
    /// unauthorized-session policy.
    ///
    /// Only the token the request was sent with is cleared; a session stored
    /// while the request was in flight is kept.
    pub async fn execute_authenticated<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = request.build()?;
        let sent_token = bearer_token(&request);
        let result = self.send(request).await;
        if let Err(error) = &result {
            if error.is_auth_expired() && self.clear_session_on_unauthorized {
                self.clear_rejected_session(sent_token.as_deref());
            }
        }
        result
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, ClientError> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Portal API response");

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_status(status, body))
        }
    }

    fn clear_rejected_session(&self, sent_token: Option<&str>) {
        let Some(sent_token) = sent_token else {
            return;
        };
        if self.session.token().as_deref() != Some(sent_token) {
            debug!("Rejected token was already replaced, keeping current session");
            return;
        }
        warn!("Server rejected stored token, clearing session");
        if let Err(e) = self.session.clear_session() {
            warn!(error = %e, "Failed to clear rejected session");
        }
    }
}

fn bearer_token(request: &reqwest::Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

// Two clients are interchangeable when they target the same API through the
// same session
impl PartialEq for PortalClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.session == other.session
    }
}

/// Percent-encode a caller-supplied path segment
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

/// Builder for PortalClient
#[derive(Default)]
pub struct PortalClientBuilder {
    base_url: Option<String>,
    session: Option<SessionStore>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    clear_session_on_unauthorized: bool,
}

impl PortalClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Session the client reads tokens from and writes logins to.
    ///
    /// Defaults to a fresh in-memory session.
    #[must_use]
    pub fn session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Clear the stored session when an authenticated call gets HTTP 401
    #[must_use]
    pub const fn clear_session_on_unauthorized(mut self, enabled: bool) -> Self {
        self.clear_session_on_unauthorized = enabled;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PortalClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder =
            client_builder.user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()));

        let client = client_builder.build()?;

        Ok(PortalClient {
            client,
            base_url,
            session: self.session.unwrap_or_default(),
            clear_session_on_unauthorized: self.clear_session_on_unauthorized,
        })
    }
}
