//! Authentication for Dirgate
//!
//! The `Directory` trait is the seam between the gateway and the backing
//! directory: the production backend speaks LDAP via `ldap3`, the in-memory
//! backend serves tests and local demos. `AuthGateway` owns the
//! lookup-then-compare flow and the failure taxonomy.

pub mod directory;
pub mod gateway;
pub mod password;

pub use directory::{Directory, DirectoryError, LdapDirectory, MemoryDirectory};
pub use gateway::AuthGateway;
pub use password::PasswordVerifier;
