//! Storage-backed session store.

use std::fmt;
use std::sync::Arc;

use bountyboard_storage::{KeyValueStore, SharedStore, load_json, save_json};
use bountyboard_types::{Session, UserSummary};
use parking_lot::RwLock;

use crate::error::{AuthError, Result};
use crate::record::SessionRecord;

/// Default storage key for the session record.
pub use bountyboard_types::defaults::SESSION_KEY as DEFAULT_SESSION_KEY;

// ============================================================================
// SessionProvider Trait
// ============================================================================

/// Read/write access to the current session.
///
/// The HTTP client only ever touches credentials through this trait.
pub trait SessionProvider: Send + Sync + fmt::Debug {
    /// Current session, if any.
    fn session(&self) -> Option<Session>;

    /// Replace the whole session (login or verification success).
    fn set_session(&self, session: Session) -> Result<()>;

    /// Replace both tokens at once, keeping the cached user.
    fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()>;

    /// Replace the cached user of the current session.
    fn set_user(&self, user: UserSummary) -> Result<()>;

    /// Drop the session from memory and durable storage.
    fn logout(&self) -> Result<()>;

    fn access_token(&self) -> Option<String> {
        self.session()
            .map(|s| s.access_token)
            .filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.session()
            .map(|s| s.refresh_token)
            .filter(|t| !t.is_empty())
    }

    fn user(&self) -> Option<UserSummary> {
        self.session().and_then(|s| s.user)
    }

    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Shared session provider for use across async contexts.
pub type SharedSessionProvider = Arc<dyn SessionProvider>;

// ============================================================================
// TokenStore
// ============================================================================

/// Session store with an in-memory cache over durable storage.
pub struct TokenStore {
    store: SharedStore,
    key: String,
    cached: RwLock<Option<Session>>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &self.key)
            .field("hydrated", &self.cached.read().is_some())
            .finish()
    }
}

impl TokenStore {
    /// Create a store using [`DEFAULT_SESSION_KEY`].
    pub fn new(store: SharedStore) -> Self {
        Self::with_key(store, DEFAULT_SESSION_KEY)
    }

    /// Create a store using a custom storage key.
    pub fn with_key(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            cached: RwLock::new(None),
        }
    }

    /// Wrap in an `Arc` for sharing with the HTTP client.
    pub fn shared(self) -> SharedSessionProvider {
        Arc::new(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Forget the in-memory copy; the next read goes back to storage.
    pub fn clear_cache(&self) {
        *self.cached.write() = None;
    }

    fn load_durable(&self) -> Option<Session> {
        load_json::<SessionRecord, _>(self.store.as_ref(), &self.key)?.into_session()
    }

    fn persist(&self, session: &Session) -> Result<()> {
        save_json(
            self.store.as_ref(),
            &self.key,
            &SessionRecord::from_session(session),
        )?;
        *self.cached.write() = Some(session.clone());
        Ok(())
    }
}

impl SessionProvider for TokenStore {
    fn session(&self) -> Option<Session> {
        if let Some(session) = self.cached.read().as_ref() {
            return Some(session.clone());
        }

        let loaded = self.load_durable()?;
        tracing::debug!(key = %self.key, "hydrated session from storage");
        *self.cached.write() = Some(loaded.clone());
        Some(loaded)
    }

    fn set_session(&self, session: Session) -> Result<()> {
        self.persist(&session)?;
        tracing::info!(
            user = session.user.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
            "session stored"
        );
        Ok(())
    }

    fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let user = self.session().and_then(|s| s.user);
        let session = Session {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user,
        };
        self.persist(&session)?;
        tracing::debug!("session tokens replaced");
        Ok(())
    }

    fn set_user(&self, user: UserSummary) -> Result<()> {
        let mut session = self.session().ok_or(AuthError::NoSession)?;
        session.user = Some(user);
        self.persist(&session)
    }

    fn logout(&self) -> Result<()> {
        *self.cached.write() = None;
        self.store.remove(&self.key)?;
        tracing::info!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bountyboard_storage::{FileStore, MemoryStore};
    use tempfile::tempdir;

    fn memory_store() -> (MemoryStore, TokenStore) {
        let backing = MemoryStore::new();
        let store = TokenStore::new(Arc::new(backing.clone()));
        (backing, store)
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let (_, store) = memory_store();
        assert!(store.session().is_none());
        assert!(!store.is_authenticated());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_set_session_persists() {
        let (backing, store) = memory_store();
        store
            .set_session(Session::new("acc", "ref").with_user(UserSummary::new("u1")))
            .unwrap();

        assert!(backing.contains_key(DEFAULT_SESSION_KEY));
        assert_eq!(store.access_token().as_deref(), Some("acc"));
        assert_eq!(store.user().unwrap().id, "u1");
    }

    #[test]
    fn test_set_tokens_keeps_user() {
        let (_, store) = memory_store();
        store
            .set_session(Session::new("a1", "r1").with_user(UserSummary::new("u1")))
            .unwrap();
        store.set_tokens("a2", "r2").unwrap();

        let session = store.session().unwrap();
        assert_eq!(session.access_token, "a2");
        assert_eq!(session.refresh_token, "r2");
        assert_eq!(session.user.unwrap().id, "u1");
    }

    #[test]
    fn test_cold_start_reads_durable_record() {
        let backing = MemoryStore::new();
        let writer = TokenStore::new(Arc::new(backing.clone()));
        writer.set_session(Session::new("acc", "ref")).unwrap();

        // Another instance over the same storage, nothing cached yet
        let reader = TokenStore::new(Arc::new(backing));
        assert_eq!(reader.refresh_token().as_deref(), Some("ref"));
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let (backing, store) = memory_store();
        store.set_session(Session::new("acc", "ref")).unwrap();
        store.logout().unwrap();

        assert!(store.session().is_none());
        assert!(!backing.contains_key(DEFAULT_SESSION_KEY));
    }

    #[test]
    fn test_set_user_requires_session() {
        let (_, store) = memory_store();
        let err = store.set_user(UserSummary::new("u1")).unwrap_err();
        assert!(matches!(err, AuthError::NoSession));
    }

    #[test]
    fn test_corrupt_record_is_no_session() {
        let backing = MemoryStore::new();
        backing.set(DEFAULT_SESSION_KEY, "{not json").unwrap();
        let store = TokenStore::new(Arc::new(backing));
        assert!(store.session().is_none());
    }

    #[test]
    fn test_file_backed_survives_restart() {
        let temp = tempdir().unwrap();
        {
            let store = TokenStore::new(Arc::new(FileStore::new(temp.path())));
            store.set_session(Session::new("acc", "ref")).unwrap();
        }
        let store = TokenStore::new(Arc::new(FileStore::new(temp.path())));
        assert_eq!(store.access_token().as_deref(), Some("acc"));
    }
}
