//! HTTP surface for Dirgate
//!
//! Hosts the login form, the session store, and the middleware that turns
//! "no active session" into a redirect to the login form. Every route other
//! than login and the liveness probe requires full authentication.

pub mod middleware;
pub mod routes;
pub mod server;
pub mod session;

pub use server::{AppState, GatewayServer};
pub use session::SessionStore;
