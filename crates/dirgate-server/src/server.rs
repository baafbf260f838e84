//! Gateway HTTP server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use dirgate_auth::{AuthGateway, Directory, LdapDirectory, PasswordVerifier};
use dirgate_core::{DirgateConfig, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{debug, info};

use crate::middleware::require_session;
use crate::routes;
use crate::session::SessionStore;

// Sweep cadence for dropping expired sessions that are never touched again
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<AuthGateway>,
    pub sessions: SessionStore,
    pub cookie_name: String,
}

impl AppState {
    /// Assemble the state from a directory backend and configuration.
    ///
    /// The directory is injected rather than constructed here so tests and
    /// demos can run against the in-memory backend.
    pub fn new(directory: Arc<dyn Directory>, config: &DirgateConfig) -> Self {
        let verifier = PasswordVerifier::new(config.directory.hash_algorithm);
        let gateway = AuthGateway::new(
            directory,
            verifier,
            Duration::from_secs(config.directory.timeout_seconds),
        );

        Self {
            gateway: Arc::new(gateway),
            sessions: SessionStore::new(config.session.ttl_seconds),
            cookie_name: config.session.cookie_name.clone(),
        }
    }
}

/// The authentication gateway server
pub struct GatewayServer {
    config: DirgateConfig,
}

impl GatewayServer {
    pub fn new(config: DirgateConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        self.config.validate()?;

        let directory = Arc::new(LdapDirectory::new(self.config.directory.clone()));
        let state = AppState::new(directory, &self.config);

        // Periodic sweep so abandoned sessions do not pile up
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired().await;
                if purged > 0 {
                    debug!(purged, "purged expired sessions");
                }
            }
        });

        let app = create_router(state);
        let addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );

        let listener = TcpListener::bind(&addr).await?;

        info!("Dirgate listening on http://{}", addr);
        info!("Directory: {}", self.config.directory.url);
        info!("Login form at http://{}/login", addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Build the router: open routes first, then everything behind the
/// authentication middleware. Route order is owned here, not by any global
/// registration.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(routes::index))
        .route("/whoami", get(routes::whoami))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/login", get(routes::login_form).post(routes::login_submit))
        .route("/logout", post(routes::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}
