//! Server-side login sessions.
//!
//! The session id handed to the browser is an opaque random token; everything
//! the server needs about the login lives behind it in a `SessionStore`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Cleanup runs once the map grows past this many entries.
const CLEANUP_THRESHOLD: usize = 1000;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store lock poisoned")]
    LockPoisoned,
}

/// What a live session knows about its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

/// Storage seam for sessions. The in-memory store is the only backend today.
pub trait SessionStore: Send + Sync {
    /// Start a session and return its id.
    fn create(&self, claims: SessionClaims) -> Result<String, SessionError>;

    /// Claims for a live session; `None` when unknown or expired.
    fn get(&self, session_id: &str) -> Result<Option<SessionClaims>, SessionError>;

    /// End a session. Removing an unknown id is not an error.
    fn remove(&self, session_id: &str) -> Result<(), SessionError>;

    fn ttl(&self) -> Duration;
}

/// Generate a random session id (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

struct SessionEntry {
    claims: SessionClaims,
    expires_at: Instant,
}

/// Process-local session map with a fixed TTL. Sessions do not survive a restart.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionEntry>>, SessionError> {
        self.sessions.lock().map_err(|_| SessionError::LockPoisoned)
    }
}

fn cleanup(sessions: &mut HashMap<String, SessionEntry>) {
    let now = Instant::now();
    sessions.retain(|_, entry| now < entry.expires_at);
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, claims: SessionClaims) -> Result<String, SessionError> {
        let mut sessions = self.lock()?;
        if sessions.len() > CLEANUP_THRESHOLD {
            cleanup(&mut sessions);
        }

        let session_id = generate_token();
        sessions.insert(
            session_id.clone(),
            SessionEntry {
                claims,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(session_id)
    }

    fn get(&self, session_id: &str) -> Result<Option<SessionClaims>, SessionError> {
        let mut sessions = self.lock()?;
        let Some(entry) = sessions.get(session_id) else {
            return Ok(None);
        };
        if Instant::now() >= entry.expires_at {
            sessions.remove(session_id);
            return Ok(None);
        }
        Ok(Some(entry.claims.clone()))
    }

    fn remove(&self, session_id: &str) -> Result<(), SessionError> {
        self.lock()?.remove(session_id);
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_id: i64) -> SessionClaims {
        SessionClaims {
            user_id,
            username: format!("user{user_id}"),
            role: "doctor".into(),
        }
    }

    #[test]
    fn created_session_is_readable() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = store.create(claims(1)).unwrap();
        assert_eq!(store.get(&id).unwrap(), Some(claims(1)));
    }

    #[test]
    fn session_ids_are_unique() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let a = store.create(claims(1)).unwrap();
        let b = store.create(claims(1)).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn unknown_session_is_none() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn removed_session_is_gone() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = store.create(claims(1)).unwrap();
        store.remove(&id).unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
        // Idempotent
        store.remove(&id).unwrap();
    }

    #[test]
    fn expired_session_is_evicted_on_read() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let id = store.create(claims(1)).unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn cleanup_drops_expired_entries() {
        let mut map = HashMap::new();
        map.insert(
            "old".to_string(),
            SessionEntry {
                claims: claims(1),
                expires_at: Instant::now() - Duration::from_secs(1),
            },
        );
        map.insert(
            "live".to_string(),
            SessionEntry {
                claims: claims(2),
                expires_at: Instant::now() + Duration::from_secs(60),
            },
        );
        cleanup(&mut map);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("live"));
    }

    #[test]
    fn generate_token_is_url_safe() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
