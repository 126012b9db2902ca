//! Normalized API service
//!
//! Every backend call is exposed as an [`Outcome`]: the decoded response, or a
//! single display-ready message. Failures never escape as [`ClientError`].
//! The message is, in order of preference, the server's `detail` field, the
//! transport error, then a fixed per-operation fallback.

use crate::client::{ClientError, PortalClient};
use crate::types::{
    AdminStats, ApplicationStatus, CompanyData, CompanyInfo, LoginRequest, MessageResponse,
    PasswordResetConfirm, PasswordResetRequest, RegisterRequest, ReviewAction, TokenResponse,
    UserProfile,
};
use portal_core::SessionStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Result of a normalized operation
pub type Outcome<T> = Result<T, String>;

/// Serializable `{data, error}` form of an [`Outcome`].
///
/// Built from an `Outcome`, exactly one side is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> From<Outcome<T>> for Envelope<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                data: None,
                error: Some(error),
            },
        }
    }
}

impl<T> Envelope<T> {
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Back to an `Outcome`; an error wins over data, and an envelope with
    /// neither is treated as a failure
    pub fn into_outcome(self) -> Outcome<T> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err("Empty response envelope".to_string()),
        }
    }
}

/// Display message for a failed call
pub fn failure_message(error: &ClientError, fallback: &str) -> String {
    if let Some(detail) = error.detail() {
        return detail.to_string();
    }
    match error {
        ClientError::Request(e) => e.to_string(),
        ClientError::Serialization(e) => e.to_string(),
        ClientError::Session(e) => e.to_string(),
        ClientError::Configuration(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

fn normalize<T>(result: Result<T, ClientError>, operation: &str, fallback: &str) -> Outcome<T> {
    result.map_err(|error| {
        debug!(operation, error = %error, "Portal API call failed");
        failure_message(&error, fallback)
    })
}

/// Portal API service with uniform `{data, error}` results
#[derive(Clone, PartialEq)]
pub struct PortalService {
    client: PortalClient,
}

impl PortalService {
    pub const fn new(client: PortalClient) -> Self {
        Self { client }
    }

    pub const fn client(&self) -> &PortalClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session().is_admin()
    }

    /// Cached profile from the last login or register
    pub fn stored_user(&self) -> Option<UserProfile> {
        self.session().user()
    }

    // ============== Authentication ==============

    pub async fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Outcome<TokenResponse> {
        let request = RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };
        normalize(
            self.client.register(&request).await,
            "register",
            "Registration failed",
        )
    }

    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Outcome<TokenResponse> {
        let request = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        normalize(self.client.login(&request).await, "login", "Login failed")
    }

    /// Clear the local session. Always succeeds from the caller's view; a
    /// storage failure is only logged.
    pub fn logout(&self) {
        if let Err(e) = self.client.logout() {
            warn!(error = %e, "Failed to clear session on logout");
        }
    }

    pub async fn current_user(&self) -> Outcome<UserProfile> {
        normalize(
            self.client.current_user().await,
            "current_user",
            "Failed to get user info",
        )
    }

    pub async fn forgot_password(&self, email: impl Into<String>) -> Outcome<MessageResponse> {
        let request = PasswordResetRequest {
            email: email.into(),
        };
        normalize(
            self.client.forgot_password(&request).await,
            "forgot_password",
            "Failed to request password reset",
        )
    }

    pub async fn reset_password(
        &self,
        token: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Outcome<MessageResponse> {
        let request = PasswordResetConfirm {
            token: token.into(),
            new_password: new_password.into(),
        };
        normalize(
            self.client.reset_password(&request).await,
            "reset_password",
            "Failed to reset password",
        )
    }

    // ============== Company/Application ==============

    pub async fn create_company(&self, data: &CompanyData) -> Outcome<CompanyInfo> {
        normalize(
            self.client.create_company(data).await,
            "create_company",
            "An error occurred",
        )
    }

    pub async fn my_application(&self) -> Outcome<CompanyInfo> {
        normalize(
            self.client.my_application().await,
            "my_application",
            "Failed to get application",
        )
    }

    pub async fn company(&self, company_id: &str) -> Outcome<CompanyInfo> {
        normalize(
            self.client.company(company_id).await,
            "company",
            "An error occurred",
        )
    }

    // ============== Admin ==============

    pub async fn applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Outcome<Vec<CompanyInfo>> {
        normalize(
            self.client.applications(status).await,
            "applications",
            "Failed to get applications",
        )
    }

    pub async fn review_application(
        &self,
        company_id: &str,
        review: &ReviewAction,
    ) -> Outcome<CompanyInfo> {
        normalize(
            self.client.review_application(company_id, review).await,
            "review_application",
            "Failed to review application",
        )
    }

    pub async fn admin_stats(&self) -> Outcome<AdminStats> {
        normalize(
            self.client.admin_stats().await,
            "admin_stats",
            "Failed to get stats",
        )
    }

    // ============== Chatbot ==============

    pub async fn send_chat_message(
        &self,
        message: impl Into<String>,
        session_id: Option<i64>,
    ) -> Outcome<JsonValue> {
        normalize(
            self.client.send_chat_message(message, session_id).await,
            "send_chat_message",
            "Failed to send message",
        )
    }

    pub async fn chat_sessions(&self) -> Outcome<JsonValue> {
        normalize(
            self.client.chat_sessions().await,
            "chat_sessions",
            "Failed to get chat sessions",
        )
    }

    pub async fn chat_messages(&self, session_id: i64) -> Outcome<JsonValue> {
        normalize(
            self.client.chat_messages(session_id).await,
            "chat_messages",
            "Failed to get chat messages",
        )
    }

    pub async fn onboarding_data(&self, session_id: i64) -> Outcome<JsonValue> {
        normalize(
            self.client.onboarding_data(session_id).await,
            "onboarding_data",
            "Failed to get onboarding data",
        )
    }

    pub async fn export_onboarding_data(&self, session_id: i64) -> Outcome<JsonValue> {
        normalize(
            self.client.export_onboarding_data(session_id).await,
            "export_onboarding_data",
            "Failed to export onboarding data",
        )
    }

    pub async fn export_all_onboarding_data(&self) -> Outcome<JsonValue> {
        normalize(
            self.client.export_all_onboarding_data().await,
            "export_all_onboarding_data",
            "Failed to export onboarding data",
        )
    }

    // ============== Generic ==============

    pub async fn get(&self, path: &str) -> Outcome<JsonValue> {
        normalize(self.client.get(path).await, "get", "Request failed")
    }

    pub async fn post(&self, path: &str, body: &JsonValue) -> Outcome<JsonValue> {
        normalize(self.client.post(path, body).await, "post", "Request failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn envelope_from_success_has_only_data() {
        let envelope: Envelope<u32> = Ok(5).into();
        assert_eq!(envelope.data, Some(5));
        assert_eq!(envelope.error, None);
        assert!(!envelope.is_error());
    }

    #[test]
    fn envelope_from_failure_has_only_error() {
        let envelope: Envelope<u32> = Err("boom".to_string()).into();
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.error.as_deref(), Some("boom"));
        assert_eq!(envelope.into_outcome(), Err("boom".to_string()));
    }

    #[test]
    fn envelope_serializes_both_keys() {
        let json = serde_json::to_value(Envelope::<u32>::from(Err("nope".to_string()))).unwrap();
        assert_eq!(json, serde_json::json!({"data": null, "error": "nope"}));
    }

    #[test]
    fn empty_envelope_is_a_failure() {
        let envelope: Envelope<u32> = Envelope {
            data: None,
            error: None,
        };
        assert!(envelope.into_outcome().is_err());
    }

    #[test]
    fn detail_beats_fallback() {
        let error = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Username already registered"}"#.to_string(),
        );
        assert_eq!(
            failure_message(&error, "Registration failed"),
            "Username already registered"
        );
    }

    #[test]
    fn status_without_detail_uses_fallback() {
        let error = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>".to_string());
        assert_eq!(failure_message(&error, "Failed to get stats"), "Failed to get stats");
    }

    #[test]
    fn configuration_errors_keep_their_message() {
        let error = ClientError::Configuration("base_url is required".to_string());
        assert_eq!(failure_message(&error, "x"), "base_url is required");
    }
}
