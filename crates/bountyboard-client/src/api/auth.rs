//! Auth API.
//!
//! Successful login and verification calls store the new session in the
//! client's session provider before returning it.

use bountyboard_auth::SessionProvider;
use bountyboard_types::{Session, UserSummary};
use serde_json::Value;

use crate::client::BountyClient;
use crate::error::{Error, Result};
use crate::tokens::{normalize_tokens, unwrap_data};
use crate::types::{
    LoginOutcome, LoginRequest, RefreshRequest, VerifyCodeRequest, VerifyTotpRequest, user_from,
};

/// Auth API client.
pub struct AuthApi {
    client: BountyClient,
}

impl AuthApi {
    pub(crate) fn new(client: BountyClient) -> Self {
        Self { client }
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body: Value = self.client.post("auth/login", &request).await?;

        if let Some(pending) = LoginOutcome::pending(&body, email) {
            tracing::info!(email, "login needs a second step");
            return Ok(pending);
        }

        Ok(LoginOutcome::Authenticated(self.store_session(&body)?))
    }

    /// Finish login with an emailed verification code.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<Session> {
        let request = VerifyCodeRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        let body: Value = self.client.post("auth/verify-code", &request).await?;
        self.store_session(&body)
    }

    /// Finish login with an authenticator-app code.
    pub async fn verify_totp(&self, email: &str, token: &str) -> Result<Session> {
        let request = VerifyTotpRequest {
            email: email.to_string(),
            token: token.to_string(),
        };
        let body: Value = self.client.post("auth/verify-totp", &request).await?;
        self.store_session(&body)
    }

    /// Fetch the current user and cache it on the session.
    pub async fn me(&self) -> Result<UserSummary> {
        let body: Value = self.client.get("auth/me").await?;
        let user = user_from(&body)
            .ok_or_else(|| Error::UnexpectedResponse("no user in /auth/me response".to_string()))?;
        self.client.session().set_user(user.clone())?;
        Ok(user)
    }

    /// Refresh the session now, without waiting for a 401.
    pub async fn refresh(&self) -> Result<Session> {
        self.client.refresh_session().await
    }

    /// Log out. The backend is told on a best-effort basis; the local
    /// session is always cleared.
    pub async fn logout(&self) -> Result<()> {
        let session = self.client.session();
        if let Some(refresh_token) = session.refresh_token() {
            let request = RefreshRequest {
                refresh_token: &refresh_token,
            };
            if let Err(e) = self.client.post_empty("auth/logout", &request).await {
                tracing::debug!(error = %e, "backend logout failed, clearing local session anyway");
            }
        }
        session.logout()?;
        Ok(())
    }

    /// Turn an auth response into a stored session.
    fn store_session(&self, body: &Value) -> Result<Session> {
        let pair = normalize_tokens(body).ok_or_else(|| {
            Error::UnexpectedResponse("auth response carried no access token".to_string())
        })?;

        let mut session = Session::new(pair.access_token, pair.refresh_token.unwrap_or_default());
        session.user = user_from(body).filter(|_| has_user(body));

        self.client.session().set_session(session.clone())?;
        Ok(session)
    }
}

/// Only trust a `user` object that is actually present; a bare token
/// response must not be mistaken for a user.
fn has_user(body: &Value) -> bool {
    unwrap_data(body).get("user").is_some()
}
