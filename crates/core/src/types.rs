use serde::{Deserialize, Serialize};

/// Role string the backend assigns to administrators
pub const ADMIN_ROLE: &str = "admin";

/// Profile snapshot returned by the backend at login/register time.
///
/// The cached copy is never refreshed; it can drift from server state until the
/// next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl UserProfile {
    /// Whether the cached role is `admin`.
    ///
    /// Only used to steer navigation. Admin endpoints are authorized by the
    /// backend regardless of what this returns.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Token and profile as currently held in storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}
