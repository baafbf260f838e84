//! Configuration for Dirgate

use crate::{Error, Result, DN_PLACEHOLDER, USERNAME_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirgateConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DirgateConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            directory: DirectoryConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DirgateConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::ConfigRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("DIRGATE_BIND_ADDRESS") {
            config.server.bind_address = addr;
        }
        if let Ok(port) = std::env::var("DIRGATE_PORT") {
            if let Ok(p) = port.parse() {
                config.server.port = p;
            }
        }
        if let Ok(url) = std::env::var("DIRGATE_DIRECTORY_URL") {
            config.directory.url = url;
        }
        if let Ok(base) = std::env::var("DIRGATE_BASE_DN") {
            config.directory.base_dn = base;
        }
        if let Ok(dn) = std::env::var("DIRGATE_BIND_DN") {
            config.directory.bind_dn = Some(dn);
        }
        if let Ok(pw) = std::env::var("DIRGATE_BIND_PASSWORD") {
            config.directory.bind_password = Some(pw);
        }
        if let Ok(ttl) = std::env::var("DIRGATE_SESSION_TTL") {
            if let Ok(t) = ttl.parse() {
                config.session.ttl_seconds = t;
            }
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        self.directory.validate()?;

        if self.session.cookie_name.is_empty() {
            return Err(Error::InvalidConfig(
                "session cookie name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Directory backend configuration.
///
/// Defaults match a local OpenLDAP seeded with the classic
/// `dc=springframework,dc=org` sample tree on port 8389.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DirectoryConfig {
    /// Directory server URL (ldap:// or ldaps://)
    #[serde(default = "default_directory_url")]
    pub url: String,

    /// Root DN under which all bases are resolved
    #[serde(default = "default_base_dn")]
    pub base_dn: String,

    /// DN pattern for user entries, relative to `base_dn`.
    /// Must contain the `{username}` placeholder.
    #[serde(default = "default_people_pattern")]
    pub people_pattern: String,

    /// Search base for group entries, relative to `base_dn`
    #[serde(default = "default_groups_base")]
    pub groups_base: String,

    /// Group membership filter; `{dn}` and `{username}` are substituted
    #[serde(default = "default_group_filter")]
    pub group_filter: String,

    /// Entry attribute holding the password hash
    #[serde(default = "default_password_attribute")]
    pub password_attribute: String,

    /// Hash algorithm used for password comparison
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Optional service account used to bind before searching.
    /// When absent the search runs over an anonymous bind.
    #[serde(default)]
    pub bind_dn: Option<String>,

    #[serde(default)]
    pub bind_password: Option<String>,

    /// Deadline for one directory lookup, connect included
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_directory_url() -> String {
    "ldap://localhost:8389".to_string()
}

fn default_base_dn() -> String {
    "dc=springframework,dc=org".to_string()
}

fn default_people_pattern() -> String {
    "uid={username},ou=people".to_string()
}

fn default_groups_base() -> String {
    "ou=groups".to_string()
}

fn default_group_filter() -> String {
    "(member={dn})".to_string()
}

fn default_password_attribute() -> String {
    "userPassword".to_string()
}

fn default_timeout() -> u64 {
    5
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: default_directory_url(),
            base_dn: default_base_dn(),
            people_pattern: default_people_pattern(),
            groups_base: default_groups_base(),
            group_filter: default_group_filter(),
            password_attribute: default_password_attribute(),
            hash_algorithm: HashAlgorithm::default(),
            bind_dn: None,
            bind_password: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl DirectoryConfig {
    /// Build the full user DN from the people pattern and base DN
    pub fn user_dn(&self, username: &str) -> String {
        let rdn = self.people_pattern.replace(USERNAME_PLACEHOLDER, username);
        if self.base_dn.is_empty() {
            rdn
        } else {
            format!("{},{}", rdn, self.base_dn)
        }
    }

    /// Full DN of the group search base
    pub fn groups_dn(&self) -> String {
        if self.base_dn.is_empty() {
            self.groups_base.clone()
        } else {
            format!("{},{}", self.groups_base, self.base_dn)
        }
    }

    /// Build the group membership filter for a resolved user
    pub fn build_group_filter(&self, user_dn: &str, username: &str) -> String {
        self.group_filter
            .replace(DN_PLACEHOLDER, user_dn)
            .replace(USERNAME_PLACEHOLDER, username)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| Error::InvalidConfig(format!("invalid directory URL: {}", e)))?;

        if url.scheme() != "ldap" && url.scheme() != "ldaps" {
            return Err(Error::InvalidConfig(
                "directory URL must use the ldap:// or ldaps:// scheme".to_string(),
            ));
        }

        if !self.people_pattern.contains(USERNAME_PLACEHOLDER) {
            return Err(Error::InvalidConfig(format!(
                "people pattern must contain the {} placeholder",
                USERNAME_PLACEHOLDER
            )));
        }

        if self.password_attribute.is_empty() {
            return Err(Error::InvalidConfig(
                "password attribute must not be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::InvalidConfig(
                "directory timeout must be at least one second".to_string(),
            ));
        }

        if self.bind_dn.is_some() != self.bind_password.is_some() {
            return Err(Error::InvalidConfig(
                "bind_dn and bind_password must be set together".to_string(),
            ));
        }

        Ok(())
    }
}

/// Password hashing scheme for the stored attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// Adaptive Blowfish-based hash, `$2a$`/`$2b$`/`$2y$` prefixes
    #[default]
    Bcrypt,
    /// Plaintext comparison, local development only
    Plain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,

    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_cookie_name() -> String {
    "dirgate_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dn_from_pattern() {
        let config = DirectoryConfig::default();
        assert_eq!(
            config.user_dn("alice"),
            "uid=alice,ou=people,dc=springframework,dc=org"
        );
    }

    #[test]
    fn test_user_dn_without_base() {
        let config = DirectoryConfig {
            base_dn: String::new(),
            ..Default::default()
        };
        assert_eq!(config.user_dn("alice"), "uid=alice,ou=people");
    }

    #[test]
    fn test_groups_dn() {
        let config = DirectoryConfig::default();
        assert_eq!(config.groups_dn(), "ou=groups,dc=springframework,dc=org");
    }

    #[test]
    fn test_group_filter_substitution() {
        let config = DirectoryConfig::default();
        let filter = config.build_group_filter("uid=alice,ou=people,dc=springframework,dc=org", "alice");
        assert_eq!(filter, "(member=uid=alice,ou=people,dc=springframework,dc=org)");

        let config = DirectoryConfig {
            group_filter: "(memberUid={username})".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.build_group_filter("ignored", "alice"),
            "(memberUid=alice)"
        );
    }

    #[test]
    fn test_validation_rejects_bad_scheme() {
        let config = DirectoryConfig {
            url: "http://localhost:8389".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_requires_username_placeholder() {
        let config = DirectoryConfig {
            people_pattern: "uid=fixed,ou=people".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_requires_paired_bind_credentials() {
        let config = DirectoryConfig {
            bind_dn: Some("cn=admin,dc=springframework,dc=org".to_string()),
            bind_password: None,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(DirgateConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [server]
            port = 9090

            [directory]
            url = "ldaps://ldap.example.org:636"
            base_dn = "dc=example,dc=org"
            bind_dn = "cn=svc,dc=example,dc=org"
            bind_password = "hunter2"

            [session]
            ttl_seconds = 600
        "#;

        let config: DirgateConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.directory.url, "ldaps://ldap.example.org:636");
        assert_eq!(config.directory.people_pattern, "uid={username},ou=people");
        assert_eq!(config.directory.password_attribute, "userPassword");
        assert_eq!(config.directory.hash_algorithm, HashAlgorithm::Bcrypt);
        assert_eq!(config.session.ttl_seconds, 600);
        assert!(config.validate().is_ok());
    }
}
