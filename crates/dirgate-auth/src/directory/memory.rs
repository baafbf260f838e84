//! In-memory directory backend for tests and local demos

use crate::directory::{Directory, DirectoryError};
use async_trait::async_trait;
use dirgate_core::types::DirectoryEntry;
use std::collections::HashMap;

/// A fixed set of directory entries keyed by username.
///
/// Read-only once built, mirroring the gateway's view of a real directory.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: HashMap<String, DirectoryEntry>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with a stored password hash and group memberships
    pub fn with_user(
        mut self,
        username: &str,
        password_hash: &str,
        groups: &[&str],
    ) -> Self {
        self.entries.insert(
            username.to_string(),
            DirectoryEntry {
                dn: format!("uid={},ou=people", username),
                password_hash: password_hash.to_string(),
                groups: groups.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
        Ok(self.entries.get(username).cloned())
    }
}
