//! Cookie-backed client sessions.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::server::ServerState;

struct SessionRecord {
    authenticated: bool,
    created_at: Instant,
}

/// In-memory session table keyed by the session cookie value.
///
/// Records older than the TTL are treated as absent and dropped on access.
pub struct SessionStore {
    cookie_name: String,
    ttl: Duration,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new(cookie_name: String, ttl: Duration) -> Self {
        Self {
            cookie_name,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Starts a new authenticated session and returns its id.
    pub fn create_authenticated(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock();
        let ttl = self.ttl;
        sessions.retain(|_, record| record.created_at.elapsed() < ttl);
        sessions.insert(
            id.clone(),
            SessionRecord {
                authenticated: true,
                created_at: Instant::now(),
            },
        );
        id
    }

    pub fn is_authenticated(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(record) = sessions.get(id) else {
            return false;
        };
        if record.created_at.elapsed() < self.ttl {
            return record.authenticated;
        }
        sessions.remove(id);
        false
    }

    pub fn remove(&self, id: &str) {
        self.sessions.lock().remove(id);
    }

    /// `Set-Cookie` value carrying `id`.
    pub fn session_cookie(&self, id: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            id,
            self.ttl.as_secs()
        )
    }

    /// `Set-Cookie` value that makes the client drop its session cookie.
    pub fn expired_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        )
    }
}

/// The calling client's session, resolved from its cookie.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: Option<String>,
    authenticated: bool,
}

impl Session {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

#[async_trait]
impl FromRequestParts<Arc<ServerState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        let id = cookie_value(&parts.headers, state.sessions.cookie_name());
        let authenticated = id
            .as_deref()
            .map(|id| state.sessions.is_authenticated(id))
            .unwrap_or(false);
        Ok(Session { id, authenticated })
    }
}

/// Finds cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn created_session_is_authenticated_until_removed() {
        let store = SessionStore::new("media_session".to_string(), Duration::from_secs(60));
        let id = store.create_authenticated();
        assert!(store.is_authenticated(&id));
        assert!(!store.is_authenticated("someone-else"));

        store.remove(&id);
        assert!(!store.is_authenticated(&id));
    }

    #[test]
    fn expired_sessions_are_rejected() {
        let store = SessionStore::new("media_session".to_string(), Duration::ZERO);
        let id = store.create_authenticated();
        assert!(!store.is_authenticated(&id));
    }

    #[test]
    fn each_login_gets_a_fresh_id() {
        let store = SessionStore::new("media_session".to_string(), Duration::from_secs(60));
        assert_ne!(store.create_authenticated(), store.create_authenticated());
    }

    #[test]
    fn cookie_value_scans_all_pairs() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en; media_session=abc-123"));
        assert_eq!(
            cookie_value(&headers, "media_session").as_deref(),
            Some("abc-123")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);

        let mut empty = HeaderMap::new();
        empty.insert(COOKIE, HeaderValue::from_static("media_session="));
        assert_eq!(cookie_value(&empty, "media_session"), None);
    }

    #[test]
    fn session_cookie_carries_ttl() {
        let store = SessionStore::new("media_session".to_string(), Duration::from_secs(90));
        let cookie = store.session_cookie("abc");
        assert!(cookie.starts_with("media_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=90"));
        assert!(store.expired_cookie().contains("Max-Age=0"));
    }
}
