//! Request and response types for the backend API.

use bountyboard_types::{Session, UserSummary, WinnerDraft};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tokens::unwrap_data;

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Email/password login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Emailed verification code submission.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Authenticator-app (TOTP) code submission.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyTotpRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Credentials accepted; the session has been stored.
    Authenticated(Session),
    /// The backend emailed a code; finish with `verify_code`.
    VerificationRequired { email: String },
    /// The account has 2FA enabled; finish with `verify_totp`.
    TwoFactorRequired { email: String },
}

fn flag(body: &Value, names: &[&str]) -> bool {
    names
        .iter()
        .any(|name| body.get(*name).and_then(Value::as_bool).unwrap_or(false))
}

impl LoginOutcome {
    /// Classify a login response body that carried no tokens.
    pub(crate) fn pending(body: &Value, email: &str) -> Option<Self> {
        let body = unwrap_data(body);
        let email = body
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or(email)
            .to_string();

        if flag(body, &["requires2FA", "requiresTwoFactor", "twoFactorRequired"]) {
            Some(LoginOutcome::TwoFactorRequired { email })
        } else if flag(body, &["requiresVerification", "needsVerification"]) {
            Some(LoginOutcome::VerificationRequired { email })
        } else {
            None
        }
    }
}

/// Pull the `user` object out of an auth response, if any.
pub(crate) fn user_from(body: &Value) -> Option<UserSummary> {
    let body = unwrap_data(body);
    let user = body.get("user").unwrap_or(body);
    serde_json::from_value(user.clone()).ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Listings
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for listing bounties or projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// Flatten into query-string pairs.
    pub(crate) fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs
    }
}

/// One entry of a winner submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerSubmission {
    pub submission_id: String,
    pub user_id: String,
    pub position: u32,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl From<&WinnerDraft> for WinnerSubmission {
    fn from(draft: &WinnerDraft) -> Self {
        Self {
            submission_id: draft.submission_id.clone(),
            user_id: draft.user_id.clone(),
            position: draft.position,
            amount: draft.amount,
            feedback: draft.feedback.clone(),
            rating: draft.rating,
        }
    }
}

/// Body of `POST /bounties/{id}/winners`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectWinnersRequest {
    pub winners: Vec<WinnerSubmission>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Decode `T` from a response that may wrap it as `{"data": ...}` or under
/// one of `keys` (e.g. `{"bounty": {...}}`).
pub(crate) fn from_envelope<T: DeserializeOwned>(body: Value, keys: &[&str]) -> Result<T> {
    let inner = unwrap_data(&body);
    let target = keys
        .iter()
        .find_map(|key| inner.get(*key))
        .unwrap_or(inner);
    serde_json::from_value(target.clone())
        .map_err(|e| Error::UnexpectedResponse(format!("{} (keys tried: {:?})", e, keys)))
}
