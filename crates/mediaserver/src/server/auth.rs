//! Shared-secret authentication and the gate in front of the media routes.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::server::error::ApiError;
use crate::server::session::Session;
use crate::server::ServerState;

/// SHA-256 digest of the shared secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash([u8; 32]);

impl PasswordHash {
    pub fn from_password(password: &str) -> Self {
        Self(Sha256::digest(password.as_bytes()).into())
    }

    /// Parses a 64 character hex digest, upper or lower case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut digest = [0u8; 32];
        for (byte, pair) in digest.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).ok()?;
            *byte = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(digest))
    }

    /// Hashes `candidate` and compares in constant time.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = Self::from_password(candidate);
        self.0
            .iter()
            .zip(candidate.0.iter())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/auth",
    tag = "auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Password accepted, session cookie set", body = AuthResponse),
        (status = 401, description = "Password rejected", body = AuthResponse),
    ),
    description = "Check the shared password and mark the session authenticated."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<AuthRequest>,
) -> Response {
    if !state.password.verify(&payload.password) {
        return (StatusCode::UNAUTHORIZED, Json(AuthResponse { success: false })).into_response();
    }

    let id = state.sessions.create_authenticated();
    tracing::info!("client authenticated");
    (
        [(SET_COOKIE, state.sessions.session_cookie(&id))],
        Json(AuthResponse { success: true }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session dropped", body = AuthResponse),
    )
)]
pub(crate) async fn logout(State(state): State<Arc<ServerState>>, session: Session) -> Response {
    if let Some(id) = session.id() {
        state.sessions.remove(id);
    }
    (
        [(SET_COOKIE, state.sessions.expired_cookie())],
        Json(AuthResponse { success: true }),
    )
        .into_response()
}

/// Middleware that rejects requests without an authenticated session before
/// the wrapped handler runs.
pub(crate) async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !session.is_authenticated() {
        return Err(ApiError::unauthorized("authentication required"));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_only_the_hashed_password() {
        let hash = PasswordHash::from_password("12345");
        assert!(hash.verify("12345"));
        assert!(!hash.verify("1234"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn hex_round_trips_with_digest() {
        let upper = "5994471ABB01112AFCC18159F6CC74B4F511B99806DA59B3CAF5A9C173CACFC5";
        let parsed = PasswordHash::from_hex(upper).expect("hex");
        assert_eq!(parsed, PasswordHash::from_password("12345"));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(PasswordHash::from_hex("").is_none());
        assert!(PasswordHash::from_hex(&"zz".repeat(32)).is_none());
        assert!(PasswordHash::from_hex(&"a".repeat(63)).is_none());
    }

    #[test]
    fn debug_does_not_leak_digest() {
        let hash = PasswordHash::from_password("secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
