use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "./reports";
pub const DEFAULT_PAGE_SIZE: i32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable settings for a single run.
///
/// Built once from the command line and handed to the pipeline by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the organizational node to look for (e.g. `ADM`).
    pub target_name: String,
    /// Directory that receives the text report. Created when absent.
    pub output_dir: PathBuf,
    /// Identity to bind as. Setting it triggers the password prompt.
    pub credential: Option<String>,
    /// Also search plain `container` objects named like the target.
    pub include_alternate: bool,
    pub quiet: u8,
    pub connection: ConnectionConfig,
}

/// Everything the LDAP adapter needs to reach and page through the directory.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// LDAP URL or bare host. `None` falls back to the caller's domain.
    pub server: Option<String>,
    /// Search root. `None` means the server's default naming context.
    pub base_dn: Option<String>,
    pub page_size: i32,
    pub timeout: Duration,
    pub starttls: bool,
    pub no_tls_verify: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server: None,
            base_dn: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            starttls: false,
            no_tls_verify: false,
        }
    }
}

/// A bind identity together with the password read from the prompt.
#[derive(Clone)]
pub struct Credential {
    pub identity: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}
