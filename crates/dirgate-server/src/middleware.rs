//! Authentication middleware
//!
//! Every request passing through here needs full authentication: an active
//! session cookie, or an HTTP Basic credential verified against the
//! directory. Anything else is redirected to the login form. Group
//! membership rides along on the principal but plays no part in the access
//! decision.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dirgate_core::types::Credential;

use crate::server::AppState;

/// Require an authenticated caller, redirecting anonymous ones to `/login`.
///
/// A valid session admits the request and attaches its principal. A Basic
/// header authenticates per-request against the directory without creating a
/// session. Basic failures answer with a status rather than a redirect,
/// since those callers are not browsers.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(id) = session_cookie(request.headers(), &state.cookie_name) {
        if let Some(session) = state.sessions.get(&id).await {
            request.extensions_mut().insert(session.principal);
            return next.run(request).await;
        }
    }

    if let Some(credential) = basic_credentials(request.headers()) {
        return match state.gateway.authenticate(&credential).await {
            Ok(principal) => {
                request.extensions_mut().insert(principal);
                next.run(request).await
            }
            Err(e) if e.is_retryable() => {
                (StatusCode::SERVICE_UNAVAILABLE, e.client_message()).into_response()
            }
            Err(e) => (StatusCode::UNAUTHORIZED, e.client_message()).into_response(),
        };
    }

    Redirect::to("/login").into_response()
}

/// Pull the session id out of the Cookie header, if present
pub fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

/// Decode an `Authorization: Basic` header into a credential
fn basic_credentials(headers: &HeaderMap) -> Option<Credential> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;

    let decoded = BASE64.decode(encoded).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    let (username, password) = credentials.split_once(':')?;
    Some(Credential::new(username, password))
}
