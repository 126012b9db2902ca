//! Onboarding chatbot client methods
//!
//! Response bodies are passed through as JSON; the backend does not publish
//! their shape.

use super::{ClientError, PortalClient};
use crate::types::ChatMessageRequest;
use reqwest::Method;
use serde_json::Value as JsonValue;

impl PortalClient {
    /// Send a message, starting a new chat session when `session_id` is `None`
    pub async fn send_chat_message(
        &self,
        message: impl Into<String>,
        session_id: Option<i64>,
    ) -> Result<JsonValue, ClientError> {
        let req = self
            .request(Method::POST, "/api/chatbot/message")
            .json(&ChatMessageRequest {
                message: message.into(),
                session_id,
            });
        self.execute_authenticated(req).await
    }

    pub async fn chat_sessions(&self) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::GET, "/api/chatbot/sessions");
        self.execute_authenticated(req).await
    }

    pub async fn chat_messages(&self, session_id: i64) -> Result<JsonValue, ClientError> {
        let req = self.request(
            Method::GET,
            &format!("/api/chatbot/sessions/{session_id}/messages"),
        );
        self.execute_authenticated(req).await
    }

    /// Onboarding data collected in one chat session
    pub async fn onboarding_data(&self, session_id: i64) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::GET, &format!("/api/chatbot/data/{session_id}"));
        self.execute_authenticated(req).await
    }

    pub async fn export_onboarding_data(&self, session_id: i64) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::GET, &format!("/api/chatbot/export/{session_id}"));
        self.execute_authenticated(req).await
    }

    pub async fn export_all_onboarding_data(&self) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::GET, "/api/chatbot/export/all");
        self.execute_authenticated(req).await
    }
}
