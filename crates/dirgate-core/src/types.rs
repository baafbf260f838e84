//! Domain types for the authentication gateway

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A username/password pair submitted for authentication.
///
/// The password is plaintext and transient: it lives for the duration of one
/// authentication attempt and is never persisted. The manual `Debug`
/// implementation keeps it out of logs and panic messages.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A directory entry as read from the backing directory.
///
/// Owned by the external directory; the gateway only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Distinguished name, e.g. `uid=alice,ou=people,dc=example,dc=org`
    pub dn: String,

    /// Stored password hash from the configured password attribute
    pub password_hash: String,

    /// Group names from the group search base. Fetched and carried on the
    /// principal, never used for access decisions.
    pub groups: Vec<String>,
}

/// The identity attached to a request after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,

    #[serde(default)]
    pub groups: Vec<String>,
}

/// An authenticated session.
///
/// Created only on the success arm of an authentication attempt; destroyed on
/// logout or expiry. Storage and cookie plumbing are the server's concern.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, principal: Principal) -> Self {
        Self {
            id,
            principal,
            created_at: Utc::now(),
        }
    }

    /// Whether the session has outlived the configured TTL.
    pub fn is_expired(&self, ttl_seconds: u64) -> bool {
        let age = Utc::now() - self.created_at;
        age >= Duration::seconds(ttl_seconds as i64)
    }
}
