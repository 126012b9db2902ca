//! Authentication API client methods

use super::{ClientError, PortalClient};
use crate::types::{
    LoginRequest, MessageResponse, PasswordResetConfirm, PasswordResetRequest, RegisterRequest,
    TokenResponse, UserProfile,
};
use reqwest::Method;
use tracing::info;

impl PortalClient {
    /// Create an account and store the returned session
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ClientError> {
        let req = self
            .public_request(Method::POST, "/api/auth/register")
            .json(request);
        let response: TokenResponse = self.execute(req).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    /// Log in with username and password and store the returned session
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        let req = self
            .public_request(Method::POST, "/api/auth/login")
            .json(request);
        let response: TokenResponse = self.execute(req).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    /// Forget the local session. The server keeps no session state to revoke.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session().clear_session()?;
        Ok(())
    }

    /// Profile of the token's owner, fresh from the server
    pub async fn current_user(&self) -> Result<UserProfile, ClientError> {
        let req = self.request(Method::GET, "/api/auth/me");
        self.execute_authenticated(req).await
    }

    /// Request a password reset email. The backend answers the same way
    /// whether or not the address is registered.
    pub async fn forgot_password(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .public_request(Method::POST, "/api/auth/forgot-password")
            .json(request);
        self.execute(req).await
    }

    /// Set a new password using an emailed reset token
    pub async fn reset_password(
        &self,
        request: &PasswordResetConfirm,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .public_request(Method::POST, "/api/auth/reset-password")
            .json(request);
        self.execute(req).await
    }

    fn store_session(&self, response: &TokenResponse) -> Result<(), ClientError> {
        if response.access_token.is_empty() {
            return Ok(());
        }
        self.session()
            .set_session(&response.access_token, &response.user)?;
        info!(username = %response.user.username, role = %response.user.role, "Logged in");
        Ok(())
    }
}
