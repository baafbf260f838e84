//! Password comparison against stored directory hashes

use dirgate_core::config::HashAlgorithm;

// Bcrypt hash of an arbitrary throwaway string; verified on lookup misses so
// the not-found path costs the same as a real comparison.
const BURN_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Pure comparison of a plaintext password against a stored hash.
///
/// Holds no state beyond the configured algorithm; safe to share and call
/// concurrently.
#[derive(Debug, Clone, Copy)]
pub struct PasswordVerifier {
    algorithm: HashAlgorithm,
}

impl PasswordVerifier {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Compare a plaintext password against the stored hash.
    ///
    /// An unparseable or empty stored hash never matches. Bcrypt comparison
    /// is constant-time in the underlying implementation.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        if stored_hash.is_empty() {
            return false;
        }

        match self.algorithm {
            HashAlgorithm::Bcrypt => bcrypt::verify(password, stored_hash).unwrap_or(false),
            HashAlgorithm::Plain => stored_hash.as_bytes() == password.as_bytes(),
        }
    }

    /// Run one comparison against a fixed hash and discard the result.
    ///
    /// Keeps the latency of the user-not-found path level with the
    /// wrong-password path.
    pub fn burn(&self) {
        if let HashAlgorithm::Bcrypt = self.algorithm {
            let _ = bcrypt::verify("", BURN_HASH);
        }
    }
}
