//! Request and response bodies exchanged with the portal backend

use serde::{Deserialize, Serialize};
use std::fmt;

pub use portal_core::UserProfile;

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Password login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued by both register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Ask the backend to send a password reset link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Complete a password reset with the emailed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Supplier application as submitted by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyData {
    /// Unified business number
    pub company_id: String,
    pub company_name: String,
    /// Person in charge
    pub company_head: String,
    pub company_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_link: Option<String>,
}

/// Review state of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "invalid status '{other}', expected one of: pending, approved, rejected"
            )),
        }
    }
}

/// Application record as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company_id: String,
    pub company_name: String,
    pub company_head: String,
    pub company_email: String,
    #[serde(default)]
    pub company_link: Option<String>,
    pub user_id: i64,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reviewed_by: Option<i64>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Admin decision on an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAction {
    pub action: ReviewDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ReviewAction {
    pub const fn approve() -> Self {
        Self {
            action: ReviewDecision::Approve,
            rejection_reason: None,
        }
    }

    /// The backend refuses a rejection without a reason
    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            action: ReviewDecision::Reject,
            rejection_reason: Some(reason.into()),
        }
    }
}

/// Application counts by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_applications: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Message sent to the onboarding chatbot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
    /// `None` starts a new chat session
    pub session_id: Option<i64>,
}
