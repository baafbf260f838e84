//! The authentication gateway
//!
//! One lookup, one comparison, three ways to fail. The gateway performs a
//! single read against the directory, compares the submitted password with
//! the stored hash, and maps everything that can go wrong onto `AuthError`.
//! No retries, no caching, no writes.

use crate::directory::Directory;
use crate::password::PasswordVerifier;
use dirgate_core::error::AuthError;
use dirgate_core::types::{Credential, Principal};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct AuthGateway {
    directory: Arc<dyn Directory>,
    verifier: PasswordVerifier,
    timeout: Duration,
}

impl AuthGateway {
    /// Wire the gateway to a directory backend and a password verifier.
    ///
    /// `timeout` bounds one directory lookup end to end; exceeding it is
    /// reported as `DirectoryUnavailable`.
    pub fn new(directory: Arc<dyn Directory>, verifier: PasswordVerifier, timeout: Duration) -> Self {
        Self {
            directory,
            verifier,
            timeout,
        }
    }

    /// Authenticate a submitted credential.
    ///
    /// An empty or malformed username is reported as `NotFound` without
    /// touching the directory. An empty password flows through comparison
    /// and fails as a mismatch, never as a bypass. The not-found path burns
    /// one hash comparison so its latency matches the mismatch path.
    pub async fn authenticate(&self, credential: &Credential) -> Result<Principal, AuthError> {
        let username = credential.username.as_str();

        if !is_valid_username(username) {
            self.verifier.burn();
            return Err(AuthError::NotFound);
        }

        let lookup = tokio::time::timeout(self.timeout, self.directory.lookup(username));

        let entry = match lookup.await {
            Err(_) => {
                warn!(user = %username, timeout = ?self.timeout, "directory lookup timed out");
                return Err(AuthError::DirectoryUnavailable(
                    "directory lookup timed out".to_string(),
                ));
            }
            Ok(Err(e)) => {
                warn!(user = %username, error = %e, "directory lookup failed");
                return Err(AuthError::DirectoryUnavailable(e.to_string()));
            }
            Ok(Ok(entry)) => entry,
        };

        let Some(entry) = entry else {
            self.verifier.burn();
            info!(user = %username, "authentication failed, unknown user");
            return Err(AuthError::NotFound);
        };

        if !self.verifier.verify(&credential.password, &entry.password_hash) {
            info!(user = %username, "authentication failed, password mismatch");
            return Err(AuthError::PasswordMismatch);
        }

        info!(user = %username, dn = %entry.dn, "authenticated");

        Ok(Principal {
            username: username.to_string(),
            groups: entry.groups,
        })
    }
}

/// Usernames become part of DNs and search filters, so only a conservative
/// character set is accepted. Anything else names a user that cannot exist.
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 256
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryError, LdapDirectory, MemoryDirectory};
    use async_trait::async_trait;
    use dirgate_core::config::{DirectoryConfig, HashAlgorithm};
    use dirgate_core::types::DirectoryEntry;

    const TEST_COST: u32 = 4;

    fn gateway_with(directory: impl Directory + 'static) -> AuthGateway {
        AuthGateway::new(
            Arc::new(directory),
            PasswordVerifier::new(HashAlgorithm::Bcrypt),
            Duration::from_secs(2),
        )
    }

    fn directory_with_alice() -> MemoryDirectory {
        let hash = bcrypt::hash("secret", TEST_COST).unwrap();
        MemoryDirectory::new().with_user("alice", &hash, &["developers", "managers"])
    }

    #[tokio::test]
    async fn test_correct_password_authenticates() {
        let gateway = gateway_with(directory_with_alice());

        let principal = gateway
            .authenticate(&Credential::new("alice", "secret"))
            .await
            .unwrap();

        assert_eq!(principal.username, "alice");
        assert_eq!(principal.groups, vec!["developers", "managers"]);
    }

    #[tokio::test]
    async fn test_wrong_password_is_mismatch() {
        let gateway = gateway_with(directory_with_alice());

        let err = gateway
            .authenticate(&Credential::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::PasswordMismatch);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found_regardless_of_password() {
        let gateway = gateway_with(directory_with_alice());

        for password in ["anything", "secret", ""] {
            let err = gateway
                .authenticate(&Credential::new("bob", password))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotFound);
        }
    }

    #[tokio::test]
    async fn test_empty_password_is_mismatch_not_bypass() {
        let gateway = gateway_with(directory_with_alice());

        let err = gateway
            .authenticate(&Credential::new("alice", ""))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::PasswordMismatch);
    }

    #[tokio::test]
    async fn test_empty_username_is_not_found() {
        let gateway = gateway_with(directory_with_alice());

        let err = gateway
            .authenticate(&Credential::new("", "secret"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::NotFound);
    }

    #[tokio::test]
    async fn test_username_with_filter_metacharacters_is_not_found() {
        let gateway = gateway_with(directory_with_alice());

        for username in ["alice)(uid=*", "a,ou=admins", "uid=*", "a b"] {
            let err = gateway
                .authenticate(&Credential::new(username, "secret"))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotFound);
        }
    }

    #[tokio::test]
    async fn test_repeated_attempts_are_idempotent() {
        let gateway = gateway_with(directory_with_alice());

        for _ in 0..3 {
            let principal = gateway
                .authenticate(&Credential::new("alice", "secret"))
                .await
                .unwrap();
            assert_eq!(principal.username, "alice");
        }

        for _ in 0..3 {
            let err = gateway
                .authenticate(&Credential::new("alice", "wrong"))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::PasswordMismatch);
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl Directory for BrokenDirectory {
        async fn lookup(&self, _: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
            Err(DirectoryError::Connect("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_directory_failure_is_unavailable() {
        let gateway = gateway_with(BrokenDirectory);

        let err = gateway
            .authenticate(&Credential::new("alice", "secret"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, AuthError::DirectoryUnavailable(_)));
    }

    struct HangingDirectory;

    #[async_trait]
    impl Directory for HangingDirectory {
        async fn lookup(&self, _: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_slow_directory_hits_deadline_not_forever() {
        let gateway = AuthGateway::new(
            Arc::new(HangingDirectory),
            PasswordVerifier::new(HashAlgorithm::Bcrypt),
            Duration::from_millis(50),
        );

        let start = std::time::Instant::now();
        let err = gateway
            .authenticate(&Credential::new("alice", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DirectoryUnavailable(_)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_refused_ldap_connection_is_unavailable() {
        let config = DirectoryConfig {
            url: "ldap://127.0.0.1:1".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        };
        let gateway = gateway_with(LdapDirectory::new(config));

        let err = gateway
            .authenticate(&Credential::new("alice", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DirectoryUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_password_attribute_is_mismatch() {
        // Entry exists but carries no stored hash; must fail closed.
        let directory = MemoryDirectory::new().with_user("alice", "", &[]);
        let gateway = gateway_with(directory);

        let err = gateway
            .authenticate(&Credential::new("alice", "secret"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::PasswordMismatch);
    }
}
