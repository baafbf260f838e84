//! Error types for Dirgate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Failed to read config file: {0}")]
    ConfigRead(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Internal Errors
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn http_status(&self) -> u16 {
        match self {
            Error::ConfigRead(_)
            | Error::ConfigParse(_)
            | Error::InvalidConfig(_)
            | Error::InternalError(_)
            | Error::Io(_)
            | Error::Other(_) => 500,
        }
    }
}

/// Authentication failure taxonomy.
///
/// `NotFound` and `PasswordMismatch` are terminal for the attempt and are
/// surfaced to the client with an identical message so callers cannot probe
/// which usernames exist. `DirectoryUnavailable` is transient and retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found in directory")]
    NotFound,

    #[error("password does not match stored hash")]
    PasswordMismatch,

    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

impl AuthError {
    /// Message safe to show to the end user. Never discloses whether the
    /// username exists, and never leaks directory internals.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::NotFound | AuthError::PasswordMismatch => "invalid username or password",
            AuthError::DirectoryUnavailable(_) => {
                "authentication service temporarily unavailable, try again"
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::DirectoryUnavailable(_))
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::NotFound | AuthError::PasswordMismatch => 401,
            AuthError::DirectoryUnavailable(_) => 503,
        }
    }
}
