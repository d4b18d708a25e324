//! Session authentication for pjv-dash
//!
//! A single fixed username/password pair (from configuration) opens an
//! authenticated session tracked by an opaque cookie token. Failed logins
//! get a user-visible rejection; there is no lockout, rate limiting, or
//! attempt counting.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::AppState;

/// Cookie carrying the opaque session token
pub const SESSION_COOKIE: &str = "pjv_session";

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login
///
/// Validates the fixed credential pair and opens a session. The token is
/// returned only as an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let creds = &state.config.dashboard;
    if request.username != creds.username || request.password != creds.password {
        warn!("rejected login for user '{}'", request.username);
        return Err(AuthError::BadCredentials);
    }

    let token = state.sessions.create();
    info!("session opened for user '{}'", request.username);

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        SESSION_COOKIE, token
    );
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "status": "ok" })),
    )
        .into_response())
}

/// POST /api/logout
///
/// Clears the session's authenticated flag and expires the cookie.
/// Idempotent: logging out without a session is still a 200.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.close(&token);
    }
    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "status": "ok" })),
    )
        .into_response()
}

/// Authentication middleware for the data routes.
///
/// Returns 401 when no authenticated session cookie is present.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = session_token(request.headers()).ok_or(AuthError::NotAuthenticated)?;
    if !state.sessions.is_authenticated(&token) {
        return Err(AuthError::NotAuthenticated);
    }
    Ok(next.run(request).await)
}

/// Extract the session token from the Cookie header
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    BadCredentials,
    NotAuthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::BadCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect username or password")
            }
            AuthError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
