//! Directory backends
//!
//! A backend resolves a username to a `DirectoryEntry` (DN, stored password
//! hash, group names) or reports that no such user exists. Backends never
//! verify passwords; that stays with the gateway's verifier.

mod ldap;
mod memory;

pub use ldap::LdapDirectory;
pub use memory::MemoryDirectory;

use async_trait::async_trait;
use dirgate_core::types::DirectoryEntry;
use thiserror::Error;

/// Failure modes of a directory lookup.
///
/// All of these are transient from the gateway's point of view; the gateway
/// maps them to its retryable `DirectoryUnavailable` error.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("failed to connect to directory: {0}")]
    Connect(String),

    #[error("directory bind failed: {0}")]
    Bind(String),

    #[error("directory search failed: {0}")]
    Search(String),
}

/// Read-only lookup against an external user directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a username to its directory entry.
    ///
    /// `Ok(None)` means the user does not exist; `Err` means the directory
    /// could not be consulted at all.
    async fn lookup(&self, username: &str) -> Result<Option<DirectoryEntry>, DirectoryError>;
}
