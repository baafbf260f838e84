//! Dirgate Core Library
//!
//! Core types, configuration, and errors for the Dirgate authentication
//! gateway.

pub mod config;
pub mod error;
pub mod types;

pub use config::DirgateConfig;
pub use error::{Error, Result};

/// Dirgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder substituted with the username in DN patterns and filters
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Placeholder substituted with the user DN in group filters
pub const DN_PLACEHOLDER: &str = "{dn}";
