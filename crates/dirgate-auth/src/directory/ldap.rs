//! LDAP directory backend
//!
//! Resolves users by distinguished-name pattern: the configured people
//! pattern (`uid={username},ou=people` by default) is expanded into a full DN
//! and read directly with a base-scope search, requesting only the password
//! attribute. Group membership is collected with a second search under the
//! groups base. Supports ldap://, ldaps:// and an optional service-account
//! bind before searching.

use crate::directory::{Directory, DirectoryError};
use async_trait::async_trait;
use dirgate_core::config::DirectoryConfig;
use dirgate_core::types::DirectoryEntry;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use std::time::Duration;
use tracing::debug;

// LDAP resultCode 32, the entry named by the DN does not exist
const NO_SUCH_OBJECT: u32 = 32;

pub struct LdapDirectory {
    config: DirectoryConfig,
}

impl LdapDirectory {
    pub fn new(config: DirectoryConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<(LdapConnAsync, Ldap), DirectoryError> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.config.timeout_seconds));

        debug!(url = %self.config.url, "connecting to directory");

        LdapConnAsync::with_settings(settings, &self.config.url)
            .await
            .map_err(|e| DirectoryError::Connect(e.to_string()))
    }

    async fn service_bind(&self, ldap: &mut Ldap) -> Result<(), DirectoryError> {
        if let (Some(bind_dn), Some(bind_password)) =
            (&self.config.bind_dn, &self.config.bind_password)
        {
            let result = ldap
                .simple_bind(bind_dn, bind_password)
                .await
                .map_err(|e| DirectoryError::Bind(e.to_string()))?;

            if result.rc != 0 {
                return Err(DirectoryError::Bind(format!(
                    "service account bind failed with code {}",
                    result.rc
                )));
            }
        }

        Ok(())
    }

    /// Read the user entry at its pattern-derived DN.
    ///
    /// Returns the stored password hash, or `None` when the DN does not
    /// exist. An entry without the password attribute yields an empty hash,
    /// which can never compare equal.
    async fn read_user_entry(
        &self,
        ldap: &mut Ldap,
        user_dn: &str,
    ) -> Result<Option<String>, DirectoryError> {
        debug!(dn = %user_dn, "reading user entry");

        let result = ldap
            .search(
                user_dn,
                Scope::Base,
                "(objectClass=*)",
                vec![self.config.password_attribute.as_str()],
            )
            .await
            .map_err(|e| DirectoryError::Search(e.to_string()))?;

        let (rs, _res) = match result.success() {
            Ok(ok) => ok,
            Err(LdapError::LdapResult { result }) if result.rc == NO_SUCH_OBJECT => {
                return Ok(None);
            }
            Err(e) => return Err(DirectoryError::Search(e.to_string())),
        };

        let Some(entry) = rs.into_iter().next() else {
            return Ok(None);
        };

        let entry = SearchEntry::construct(entry);
        let hash = entry
            .attrs
            .get(&self.config.password_attribute)
            .and_then(|v| v.first().cloned())
            .unwrap_or_default();

        Ok(Some(hash))
    }

    /// Collect the names of groups the user belongs to under the groups base
    async fn search_groups(
        &self,
        ldap: &mut Ldap,
        user_dn: &str,
        username: &str,
    ) -> Result<Vec<String>, DirectoryError> {
        let filter = self.config.build_group_filter(user_dn, username);

        debug!(base = %self.config.groups_dn(), filter = %filter, "searching groups");

        let (rs, _res) = ldap
            .search(&self.config.groups_dn(), Scope::Subtree, &filter, vec!["cn"])
            .await
            .map_err(|e| DirectoryError::Search(e.to_string()))?
            .success()
            .map_err(|e| DirectoryError::Search(e.to_string()))?;

        let mut groups = Vec::new();
        for result in rs {
            let entry = SearchEntry::construct(result);
            if let Some(name) = entry.attrs.get("cn").and_then(|v| v.first()) {
                groups.push(name.clone());
            }
        }

        debug!(count = groups.len(), "groups resolved");
        Ok(groups)
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
        let (conn, mut ldap) = self.connect().await?;
        ldap3::drive!(conn);

        self.service_bind(&mut ldap).await?;

        let user_dn = self.config.user_dn(username);

        let Some(password_hash) = self.read_user_entry(&mut ldap, &user_dn).await? else {
            let _ = ldap.unbind().await;
            return Ok(None);
        };

        let groups = self.search_groups(&mut ldap, &user_dn, username).await?;

        let _ = ldap.unbind().await;

        Ok(Some(DirectoryEntry {
            dn: user_dn,
            password_hash,
            groups,
        }))
    }
}
