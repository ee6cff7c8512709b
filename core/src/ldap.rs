//! # LDAP Directory Adapter
//!
//! Concrete [`DirectoryClient`] backed by `ldap3`. One connection is opened
//! for the whole run; every search pages through results so large subtrees
//! never hit the server's size limit.

use std::time::Duration;

use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry, ldap_escape};
use oucount_common::config::{ConnectionConfig, Credential};
use oucount_common::directory::{ContainerKind, DirectoryClient, Node};
use oucount_common::error::{DirectoryError, SetupError};
use oucount_common::{info, warn};
use tracing::debug;

/// Environment variable a domain-joined Windows session exposes.
const DOMAIN_ENV: &str = "USERDNSDOMAIN";
/// Asks the server for no attributes at all; used when only entries are counted.
const NO_ATTRIBUTES: &str = "1.1";

pub struct LdapDirectory {
    ldap: Ldap,
    base_dn: String,
    page_size: i32,
    timeout: Duration,
}

impl LdapDirectory {
    /// Opens the connection, binds when a credential is given and resolves
    /// the search root.
    ///
    /// Every failure here is an environment problem and ends the run.
    pub async fn connect(
        cfg: &ConnectionConfig,
        credential: Option<&Credential>,
    ) -> Result<Self, SetupError> {
        let url = resolve_server_url(cfg.server.as_deref(), std::env::var(DOMAIN_ENV).ok())?;
        debug!(%url, starttls = cfg.starttls, "connecting to directory");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(cfg.timeout)
            .set_starttls(cfg.starttls)
            .set_no_tls_verify(cfg.no_tls_verify);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| SetupError::Connection {
                server: url.clone(),
                reason: e.to_string(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!("LDAP connection closed with an error: {}", e);
            }
        });

        match credential {
            Some(cred) => {
                ldap.simple_bind(&cred.identity, &cred.password)
                    .await
                    .and_then(|res| res.success())
                    .map_err(|e| SetupError::Bind {
                        identity: cred.identity.clone(),
                        reason: e.to_string(),
                    })?;
                info!("Bound to {} as {}", url, cred.identity);
            }
            None => info!("Connected to {} with the ambient session", url),
        }

        let base_dn = match &cfg.base_dn {
            Some(dn) => dn.clone(),
            None => default_naming_context(&mut ldap).await?,
        };
        debug!(%base_dn, "search root resolved");

        Ok(Self {
            ldap,
            base_dn,
            page_size: cfg.page_size,
            timeout: cfg.timeout,
        })
    }

    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    /// Ends the session. Errors are only worth a debug line at this point.
    pub async fn close(self) {
        let mut ldap = self.ldap;
        if let Err(e) = ldap.unbind().await {
            debug!(error = %e, "unbind failed");
        }
    }

    /// Streams a paged subtree search and hands every entry to `on_entry`.
    async fn paged_search<F>(
        &self,
        base: &str,
        filter: &str,
        attrs: Vec<&str>,
        mut on_entry: F,
    ) -> Result<(), LdapError>
    where
        F: FnMut(SearchEntry),
    {
        let mut ldap = self.ldap.clone();
        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.page_size)),
        ];

        let mut search = ldap
            .with_timeout(self.timeout)
            .streaming_search_with(adapters, base, Scope::Subtree, filter, attrs)
            .await?;

        while let Some(entry) = search.next().await? {
            on_entry(SearchEntry::construct(entry));
        }
        let _ = search.finish().await.success()?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectory {
    async fn find_nodes_by_name(
        &self,
        name: &str,
        kind: ContainerKind,
    ) -> Result<Vec<Node>, DirectoryError> {
        let filter = node_filter(name, kind);
        let naming = kind.naming_attribute();
        debug!(base = %self.base_dn, %filter, "searching nodes");

        let mut nodes = Vec::new();
        self.paged_search(&self.base_dn, &filter, vec!["distinguishedName", naming], |entry| {
            let label = first_value(&entry, naming).unwrap_or(name).to_string();
            nodes.push(Node::new(entry.dn, label));
        })
        .await
        .map_err(|e| DirectoryError {
            base: self.base_dn.clone(),
            filter: filter.clone(),
            reason: e.to_string(),
        })?;

        Ok(nodes)
    }

    async fn count_descendants_of_type(
        &self,
        base: &Node,
        object_class: &str,
    ) -> Result<u64, DirectoryError> {
        let filter = class_filter(object_class);
        let mut count: u64 = 0;

        self.paged_search(&base.distinguished_path, &filter, vec![NO_ATTRIBUTES], |_| {
            count += 1;
        })
        .await
        .map_err(|e| DirectoryError {
            base: base.distinguished_path.clone(),
            filter: filter.clone(),
            reason: e.to_string(),
        })?;

        debug!(base = %base, count, "counted descendants");
        Ok(count)
    }
}

async fn default_naming_context(ldap: &mut Ldap) -> Result<String, SetupError> {
    let (entries, _) = ldap
        .search("", Scope::Base, "(objectClass=*)", vec!["defaultNamingContext"])
        .await
        .and_then(|res| res.success())
        .map_err(|e| SetupError::RootDse(e.to_string()))?;

    entries
        .into_iter()
        .map(SearchEntry::construct)
        .find_map(|entry| first_value(&entry, "defaultNamingContext").map(str::to_string))
        .filter(|dn| !dn.trim().is_empty())
        .ok_or_else(|| SetupError::RootDse("server did not publish defaultNamingContext".into()))
}

/// Picks the LDAP URL to connect to.
///
/// An explicit server wins; a bare host gets the `ldap://` scheme. Without
/// one, the caller's DNS domain is used.
pub fn resolve_server_url(
    server: Option<&str>,
    env_domain: Option<String>,
) -> Result<String, SetupError> {
    let explicit = server.map(str::trim).filter(|s| !s.is_empty());
    if let Some(server) = explicit {
        return Ok(if server.contains("://") {
            server.to_string()
        } else {
            format!("ldap://{server}")
        });
    }

    env_domain
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .map(|d| format!("ldap://{d}"))
        .ok_or(SetupError::NoServer)
}

pub fn node_filter(name: &str, kind: ContainerKind) -> String {
    format!(
        "(&(objectClass={})({}={}))",
        kind.object_class(),
        kind.naming_attribute(),
        ldap_escape(name)
    )
}

pub fn class_filter(object_class: &str) -> String {
    format!("(objectClass={})", ldap_escape(object_class))
}

/// First value of `attr`, looked up case-insensitively since servers differ
/// in how they echo attribute names.
fn first_value<'a>(entry: &'a SearchEntry, attr: &str) -> Option<&'a str> {
    entry
        .attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(attr))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}
