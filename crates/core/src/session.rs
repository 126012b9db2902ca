//! Session store: the single source of truth for "logged in" and "admin"

use crate::storage::{MemoryStorage, SessionStorage};
use crate::types::{Session, UserProfile};
use crate::CoreError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "access_token";
/// Storage key holding the JSON-serialized [`UserProfile`]
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cached user profile is malformed: {0}")]
    MalformedUser(String),

    #[error(transparent)]
    Storage(#[from] CoreError),
}

/// Handle to the persisted session.
///
/// Cloning is cheap and every clone reads and writes the same backing
/// storage. Owned by the application root and handed to the API client and
/// the route guards.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn from_arc(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by a fresh [`MemoryStorage`]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Raw token, if one is stored.
    ///
    /// Unreadable storage and empty values both read as no token.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Cached profile, surfacing a malformed value as an error
    pub fn try_user(&self) -> Result<Option<UserProfile>, SessionError> {
        match self.storage.get(USER_KEY)? {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| SessionError::MalformedUser(e.to_string())),
            _ => Ok(None),
        }
    }

    /// Cached profile.
    ///
    /// A malformed or unreadable value is logged and reads as no user so
    /// navigation never fails on a local defect. Use [`Self::try_user`] to see
    /// the underlying error.
    pub fn user(&self) -> Option<UserProfile> {
        match self.try_user() {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "Ignoring unusable cached user profile");
                None
            }
        }
    }

    pub fn session(&self) -> Session {
        Session {
            token: self.token(),
            user: self.user(),
        }
    }

    /// Persist a server-confirmed token and profile.
    ///
    /// The token is written before the profile; a reader interleaved between
    /// the two writes can see a token without a user. If the profile write
    /// fails the previous token is put back, so a token is never left paired
    /// with another account's profile.
    pub fn set_session(&self, token: &str, user: &UserProfile) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(user).map_err(CoreError::from)?;
        let previous = self.storage.get(TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read previous token");
            None
        });
        self.storage.set(TOKEN_KEY, token)?;

        if let Err(e) = self.storage.set(USER_KEY, &serialized) {
            warn!(error = %e, "Failed to store user profile, rolling back token");
            self.rollback_token(previous.as_deref());
            return Err(e.into());
        }

        info!(user_id = user.id, username = %user.username, "Session stored");
        Ok(())
    }

    fn rollback_token(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = restored {
            // Pairing can no longer be guaranteed; drop both halves
            error!(error = %e, "Token rollback failed, clearing session");
            let _ = self.storage.remove(TOKEN_KEY);
            let _ = self.storage.remove(USER_KEY);
        }
    }

    /// Remove both token and profile. Clearing an empty session succeeds.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token?;
        user?;
        info!("Session cleared");
        Ok(())
    }

    /// True iff a token is stored. Expiry and signature are not checked.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// True iff the cached profile's role is `admin`.
    ///
    /// Client-side convenience only; the backend must authorize admin
    /// endpoints on its own.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_admin())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockSessionStorage;

    fn profile(role: &str) -> UserProfile {
        UserProfile {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            role: role.to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn empty_store_is_anonymous() {
        let store = SessionStore::in_memory();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!store.is_authenticated());
        assert!(!store.is_admin());
        assert!(store.session().is_empty());
    }

    #[test]
    fn set_session_populates_both_fields() {
        let store = SessionStore::in_memory();
        store.set_session("tok1", &profile("member")).unwrap();

        assert_eq!(store.token().as_deref(), Some("tok1"));
        assert_eq!(store.user(), Some(profile("member")));
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
    }

    #[test]
    fn admin_role_is_detected() {
        let store = SessionStore::in_memory();
        store.set_session("tok", &profile("admin")).unwrap();
        assert!(store.is_admin());
    }

    #[test]
    fn role_comparison_is_exact() {
        for role in ["Admin", "ADMIN", "admin ", "user", ""] {
            let store = SessionStore::in_memory();
            store.set_session("tok", &profile(role)).unwrap();
            assert!(!store.is_admin(), "role {role:?} must not be admin");
        }
    }

    #[test]
    fn clear_session_is_idempotent() {
        let store = SessionStore::in_memory();
        store.set_session("tok", &profile("admin")).unwrap();

        store.clear_session().unwrap();
        assert!(store.session().is_empty());

        store.clear_session().unwrap();
        assert!(store.session().is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let store = SessionStore::in_memory();
        let clone = store.clone();
        store.set_session("tok", &profile("user")).unwrap();
        assert!(clone.is_authenticated());
        assert_eq!(store, clone);
        assert_ne!(store, SessionStore::in_memory());
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "").unwrap();
        let store = SessionStore::new(storage);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn malformed_user_reads_as_none() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();
        let store = SessionStore::new(storage);

        assert!(matches!(store.try_user(), Err(SessionError::MalformedUser(_))));
        assert_eq!(store.user(), None);
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
    }

    #[test]
    fn token_without_user_is_authenticated_but_not_admin() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        let store = SessionStore::new(storage);
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
    }

    #[test]
    fn unreadable_storage_reads_as_logged_out() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(CoreError::storage_error("unavailable")));
        let store = SessionStore::new(storage);

        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clear_session_attempts_both_keys() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_remove()
            .withf(|key| key == TOKEN_KEY)
            .times(1)
            .returning(|_| Err(CoreError::storage_error("read-only")));
        storage
            .expect_remove()
            .withf(|key| key == USER_KEY)
            .times(1)
            .returning(|_| Ok(()));
        let store = SessionStore::new(storage);

        assert!(matches!(
            store.clear_session(),
            Err(SessionError::Storage(CoreError::Storage { .. }))
        ));
    }

    #[test]
    fn failed_token_write_leaves_user_untouched() {
        let mut storage = MockSessionStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .withf(|key, _| key == TOKEN_KEY)
            .times(1)
            .returning(|_, _| Err(CoreError::storage_error("quota exceeded")));
        storage.expect_set().withf(|key, _| key == USER_KEY).never();
        let store = SessionStore::new(storage);

        assert!(store.set_session("tok", &profile("user")).is_err());
    }

    /// Accepts token writes but rejects profile writes
    struct RejectUserWrites {
        inner: MemoryStorage,
    }

    impl SessionStorage for RejectUserWrites {
        fn get(&self, key: &str) -> crate::CoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> crate::CoreResult<()> {
            if key == USER_KEY {
                return Err(CoreError::storage_error("quota exceeded"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> crate::CoreResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_user_write_restores_previous_pair() {
        let inner = MemoryStorage::new();
        let admin = SessionStore::new(inner.clone());
        admin.set_session("admin-token", &profile("admin")).unwrap();

        let store = SessionStore::new(RejectUserWrites { inner });
        let mut member = profile("member");
        member.id = 2;
        assert!(store.set_session("member-token", &member).is_err());

        assert_eq!(store.token().as_deref(), Some("admin-token"));
        assert_eq!(store.user().map(|u| u.id), Some(1));
        assert!(store.is_admin());
    }

    #[test]
    fn failed_user_write_on_empty_store_leaves_it_empty() {
        let store = SessionStore::new(RejectUserWrites {
            inner: MemoryStorage::new(),
        });
        assert!(store.set_session("tok", &profile("member")).is_err());
        assert!(store.session().is_empty());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn failed_rollback_clears_both_keys() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_get()
            .withf(|key| key == TOKEN_KEY)
            .returning(|_| Ok(Some("old".to_string())));
        storage
            .expect_set()
            .withf(|key, value| key == TOKEN_KEY && value == "new")
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_set()
            .withf(|key, _| key == USER_KEY)
            .times(1)
            .returning(|_, _| Err(CoreError::storage_error("quota exceeded")));
        storage
            .expect_set()
            .withf(|key, value| key == TOKEN_KEY && value == "old")
            .times(1)
            .returning(|_, _| Err(CoreError::storage_error("quota exceeded")));
        storage
            .expect_remove()
            .withf(|key| key == TOKEN_KEY)
            .times(1)
            .returning(|_| Ok(()));
        storage
            .expect_remove()
            .withf(|key| key == USER_KEY)
            .times(1)
            .returning(|_| Ok(()));
        let store = SessionStore::new(storage);

        assert!(store.set_session("new", &profile("member")).is_err());
    }
}
