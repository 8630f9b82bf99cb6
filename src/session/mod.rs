//! Per-browser session state.
//!
//! A session starts as [`SessionState::Pending`] when sign-in begins and
//! becomes [`SessionState::Authenticated`] once the callback has exchanged the
//! verifier and fetched the feed. The snapshot inside is never refetched;
//! it lives until the session expires or the user logs out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::domain::FeedSnapshot;
use crate::oauth::{AccessToken, RequestToken};

pub const SESSION_COOKIE: &str = "tweetstats_session";

/// Everything a view handler needs about a signed-in user.
#[derive(Debug)]
pub struct SessionContext {
    pub access_token: AccessToken,
    pub snapshot: FeedSnapshot,
}

impl SessionContext {
    pub fn new(access_token: AccessToken, snapshot: FeedSnapshot) -> Self {
        Self {
            access_token,
            snapshot,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Pending(RequestToken),
    Authenticated(Arc<SessionContext>),
}

#[derive(Debug)]
struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn new_id() -> String {
        hex::encode(rand::random::<[u8; 16]>())
    }

    pub fn begin(&self, id: &str, request_token: RequestToken) {
        self.put(id, SessionState::Pending(request_token));
    }

    pub fn authenticate(&self, id: &str, context: SessionContext) -> Arc<SessionContext> {
        let context = Arc::new(context);
        self.put(id, SessionState::Authenticated(context.clone()));
        context
    }

    fn put(&self, id: &str, state: SessionState) {
        self.sessions.insert(
            id.to_string(),
            SessionEntry {
                state,
                last_seen: Instant::now(),
            },
        );
    }

    /// Returns the live state for `id`, refreshing its idle timer.
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&self, id: &str) -> Option<SessionState> {
        let mut entry = self.sessions.get_mut(id)?;
        if entry.last_seen.elapsed() > self.ttl {
            drop(entry);
            self.sessions.remove(id);
            tracing::debug!("Session {} expired", id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.state.clone())
    }

    /// The signed-in context, if the session finished sign-in.
    pub fn context(&self, id: &str) -> Option<Arc<SessionContext>> {
        match self.get(id)? {
            SessionState::Authenticated(context) => Some(context),
            SessionState::Pending(_) => None,
        }
    }

    pub fn pending_token(&self, id: &str) -> Option<RequestToken> {
        match self.get(id)? {
            SessionState::Pending(token) => Some(token),
            SessionState::Authenticated(_) => None,
        }
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops every expired session; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_token() -> RequestToken {
        RequestToken {
            token: "req".into(),
            secret: "req-secret".into(),
        }
    }

    fn context() -> SessionContext {
        SessionContext::new(
            AccessToken {
                token: "acc".into(),
                secret: "acc-secret".into(),
                user_id: "1".into(),
                screen_name: "someone".into(),
            },
            FeedSnapshot::default(),
        )
    }

    #[test]
    fn test_new_ids_are_distinct_hex() {
        let a = SessionStore::new_id();
        let b = SessionStore::new_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_pending_then_authenticated() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.begin("s1", request_token());

        assert_eq!(store.pending_token("s1"), Some(request_token()));
        assert!(store.context("s1").is_none());

        store.authenticate("s1", context());
        assert!(store.pending_token("s1").is_none());
        assert_eq!(
            store.context("s1").unwrap().access_token.screen_name,
            "someone"
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.get("missing").is_none());
        assert!(!store.remove("missing"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.authenticate("a", context());
        store.begin("b", request_token());

        assert!(store.context("a").is_some());
        assert!(store.context("b").is_none());
    }

    #[test]
    fn test_expired_session_is_absent() {
        let store = SessionStore::new(Duration::ZERO);
        store.authenticate("s1", context());
        std::thread::sleep(Duration::from_millis(5));

        assert!(store.context("s1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_removes_expired() {
        let store = SessionStore::new(Duration::ZERO);
        store.begin("a", request_token());
        store.begin("b", request_token());
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(store.sweep(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.authenticate("s1", context());
        assert!(store.remove("s1"));
        assert!(store.context("s1").is_none());
    }
}
