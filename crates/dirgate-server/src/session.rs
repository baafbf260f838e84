//! In-memory session store with TTL expiry

use dirgate_core::types::{Principal, Session};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Shared store of active sessions.
///
/// Expired sessions are dropped lazily when touched; `purge_expired` sweeps
/// the rest. The only writer on the create path is the login handler, after
/// a successful authentication.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl_seconds: u64,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Create a session for an authenticated principal
    pub async fn create(&self, principal: Principal) -> Session {
        let session = Session::new(Uuid::new_v4().to_string(), principal);

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        debug!(user = %session.principal.username, "session created");
        session
    }

    /// Look up a session by id, evicting it if expired
    pub async fn get(&self, id: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if !session.is_expired(self.ttl_seconds) => {
                    return Some(session.clone());
                }
                Some(_) => {} // expired, fall through to evict
                None => return None,
            }
        }

        self.sessions.write().await.remove(id);
        debug!("expired session evicted");
        None
    }

    /// Destroy a session (logout)
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every expired session
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl_seconds));
        before - sessions.len()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn principal() -> Principal {
        Principal {
            username: "alice".to_string(),
            groups: vec!["developers".to_string()],
        }
    }

    #[tokio::test]
    async fn test_created_session_is_retrievable() {
        let store = SessionStore::new(1800);
        let session = store.create(principal()).await;

        let found = store.get(&session.id).await.unwrap();
        assert_eq!(found.principal.username, "alice");
    }

    #[tokio::test]
    async fn test_unknown_id_misses() {
        let store = SessionStore::new(1800);
        assert!(store.get("no-such-session").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted_on_access() {
        let store = SessionStore::new(60);
        let session = store.create(principal()).await;

        // Age the session past the TTL by hand
        {
            let mut sessions = store.sessions.write().await;
            sessions.get_mut(&session.id).unwrap().created_at =
                Utc::now() - Duration::seconds(120);
        }

        assert!(store.get(&session.id).await.is_none());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_destroys_session() {
        let store = SessionStore::new(1800);
        let session = store.create(principal()).await;

        assert!(store.remove(&session.id).await);
        assert!(store.get(&session.id).await.is_none());
        assert!(!store.remove(&session.id).await);
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired() {
        let store = SessionStore::new(60);
        let old = store.create(principal()).await;
        let _fresh = store.create(principal()).await;

        {
            let mut sessions = store.sessions.write().await;
            sessions.get_mut(&old.id).unwrap().created_at = Utc::now() - Duration::seconds(120);
        }

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.count().await, 1);
    }
}
