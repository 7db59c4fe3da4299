//! In-memory session provider (for testing).

use std::sync::atomic::{AtomicU32, Ordering};

use bountyboard_types::{Session, UserSummary};
use parking_lot::RwLock;

use crate::error::{AuthError, Result};
use crate::store::SessionProvider;

/// Session provider without durable storage.
///
/// Counts token rotations and logouts so tests can assert on how the HTTP
/// client drove the session.
#[derive(Debug, Default)]
pub struct InMemorySession {
    session: RwLock<Option<Session>>,
    token_updates: AtomicU32,
    logouts: AtomicU32,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            ..Self::default()
        }
    }

    /// Number of `set_tokens` calls so far.
    pub fn token_updates(&self) -> u32 {
        self.token_updates.load(Ordering::SeqCst)
    }

    /// Number of `logout` calls so far.
    pub fn logouts(&self) -> u32 {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl SessionProvider for InMemorySession {
    fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn set_session(&self, session: Session) -> Result<()> {
        *self.session.write() = Some(session);
        Ok(())
    }

    fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let mut guard = self.session.write();
        let user = guard.as_ref().and_then(|s| s.user.clone());
        *guard = Some(Session {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user,
        });
        self.token_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_user(&self, user: UserSummary) -> Result<()> {
        let mut guard = self.session.write();
        let session = guard.as_mut().ok_or(AuthError::NoSession)?;
        session.user = Some(user);
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        *self.session.write() = None;
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
