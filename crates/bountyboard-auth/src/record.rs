//! Durable shape of the session record.
//!
//! The record is wrapped the way the web front end's persisted store writes
//! it: `{"state": {...}, "version": 0}`. Tokens may be `null` in records left
//! behind by a logged-out front end.

use bountyboard_types::{Session, UserSummary};
use serde::{Deserialize, Serialize};

/// Current record version.
pub const RECORD_VERSION: u32 = 0;

/// Persisted session envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub state: SessionState,
    #[serde(default)]
    pub version: u32,
}

/// Persisted session fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl SessionRecord {
    pub fn from_session(session: &Session) -> Self {
        Self {
            state: SessionState {
                access_token: Some(session.access_token.clone()),
                refresh_token: Some(session.refresh_token.clone()),
                user: session.user.clone(),
                is_authenticated: session.has_access_token(),
            },
            version: RECORD_VERSION,
        }
    }

    /// Convert to a session. A record without an access token holds no session.
    pub fn into_session(self) -> Option<Session> {
        let access_token = self.state.access_token.filter(|t| !t.is_empty())?;
        Some(Session {
            access_token,
            refresh_token: self.state.refresh_token.unwrap_or_default(),
            user: self.state.user,
        })
    }
}
