//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::{ServerConfig, SESSION_COOKIE};
use crate::db;
use crate::prediction::{MockPredictor, PlaceholderPredictor};
use crate::session_store::{InMemorySessionStore, SessionClaims, SessionStore};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
    pub sessions: Arc<dyn SessionStore>,
    pub predictor: Arc<dyn PlaceholderPredictor>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

impl ApiContext {
    pub fn new(
        db_path: PathBuf,
        sessions: Arc<dyn SessionStore>,
        predictor: Arc<dyn PlaceholderPredictor>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            db_path: Arc::new(db_path),
            sessions,
            predictor,
            secure_cookies,
        }
    }

    /// Production wiring: in-memory sessions and an entropy-seeded mock predictor.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.db_path.clone(),
            Arc::new(InMemorySessionStore::new(config.session_ttl)),
            Arc::new(MockPredictor::from_entropy()),
            config.production,
        )
    }

    /// Open a connection for the current request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        Ok(db::open_database(&self.db_path)?)
    }
}

// ═══════════════════════════════════════════════════════════
// Session context: injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated session, injected into request extensions by the auth
/// middleware after the cookie resolves to a live session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub claims: SessionClaims,
}

// ═══════════════════════════════════════════════════════════
// Session cookie
// ═══════════════════════════════════════════════════════════

/// Value of the session cookie from a `Cookie` header, if present.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value issuing a session.
pub fn session_set_cookie(session_id: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie.
pub fn session_clear_cookie(secure: bool) -> String {
    session_set_cookie("", Duration::ZERO, secure)
}

pub fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Internal(format!("invalid header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let headers = cookie_headers("theme=dark; xw.sid=abc123; lang=en");
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
        assert_eq!(session_cookie(&cookie_headers("theme=dark")), None);
        assert_eq!(session_cookie(&cookie_headers("xw.sid=")), None);
        // prefix of another name does not match
        assert_eq!(session_cookie(&cookie_headers("xw.sidx=abc")), None);
    }

    #[test]
    fn set_cookie_attributes() {
        let cookie = session_set_cookie("tok", Duration::from_secs(86_400), false);
        assert_eq!(cookie, "xw.sid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400");

        let secure = session_set_cookie("tok", Duration::from_secs(60), true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = session_clear_cookie(false);
        assert!(cookie.starts_with("xw.sid=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
