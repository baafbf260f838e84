//! Route handlers: login form, logout, and the protected sample routes

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use dirgate_core::types::{Credential, Principal};
use serde::Deserialize;
use tracing::info;

use crate::middleware::session_cookie;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login — the login form
pub async fn login_form() -> Html<String> {
    Html(render_login_page(None))
}

/// POST /login — authenticate and open a session
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let credential = Credential::new(form.username, form.password);

    match state.gateway.authenticate(&credential).await {
        Ok(principal) => {
            let session = state.sessions.create(principal).await;

            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                state.cookie_name,
                session.id,
                state.sessions.ttl_seconds()
            );

            let mut response = Redirect::to("/").into_response();
            if let Ok(value) = cookie.parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            response
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Html(render_login_page(Some(e.client_message())))).into_response()
        }
    }
}

/// POST /logout — destroy the session and return to the login form
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_cookie(&headers, &state.cookie_name) {
        if state.sessions.remove(&id).await {
            info!("session destroyed on logout");
        }
    }

    let clear = format!("{}=; Path=/; HttpOnly; Max-Age=0", state.cookie_name);

    let mut response = Redirect::to("/login").into_response();
    if let Ok(value) = clear.parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

/// GET / — protected landing page
pub async fn index(Extension(principal): Extension<Principal>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><body><h1>Dirgate</h1>\
         <p>Signed in as <strong>{}</strong>.</p>\
         <form method=\"post\" action=\"/logout\"><button>Sign out</button></form>\
         </body></html>",
        principal.username
    ))
}

/// GET /whoami — protected; principal and groups as JSON.
/// Groups are informational, never an access decision.
pub async fn whoami(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}

/// GET /healthz — liveness, no authentication
pub async fn healthz() -> &'static str {
    "ok"
}

fn render_login_page(error: Option<&str>) -> String {
    let notice = match error {
        Some(message) => format!("<p class=\"error\">{}</p>", message),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html><html><head><title>Sign in</title></head><body>\
         <h1>Sign in</h1>{}\
         <form method=\"post\" action=\"/login\">\
         <label>Username <input name=\"username\" autocomplete=\"username\"></label>\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\
         <button>Sign in</button>\
         </form></body></html>",
        notice
    )
}
