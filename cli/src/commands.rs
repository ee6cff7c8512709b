pub mod count;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use oucount_common::config::{
    Config, ConnectionConfig, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(name = "oucount", version)]
#[command(about = "Counts computers under every directory node with a given name, grouped by location.")]
pub struct CommandLine {
    /// Name of the organizational unit to look for (e.g. ADM)
    #[arg(env = "OUCOUNT_TARGET", value_parser = non_blank)]
    pub target_name: String,

    /// Directory the text report is written to
    #[arg(short, long, env = "OUCOUNT_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory server, as a host name or an ldap:// / ldaps:// URL
    #[arg(short, long, env = "OUCOUNT_SERVER")]
    pub server: Option<String>,

    /// Identity to bind as; the password is prompted for
    #[arg(short = 'u', long, env = "OUCOUNT_CREDENTIAL")]
    pub credential: Option<String>,

    /// Also match plain containers (CN=<name>), not only organizational units
    #[arg(short = 'a', long)]
    pub include_alternate: bool,

    /// Search root; defaults to the server's naming context
    #[arg(short, long, env = "OUCOUNT_BASE_DN")]
    pub base_dn: Option<String>,

    /// Entries requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(i32).range(1..))]
    pub page_size: i32,

    /// Connection and per-query timeout
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Upgrade the connection with StartTLS
    #[arg(long)]
    pub starttls: bool,

    /// Skip certificate verification for ldaps:// and StartTLS
    #[arg(long)]
    pub no_tls_verify: bool,

    /// Less output (-q hides the per-node tree, -qq also the headers)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        Config {
            target_name: self.target_name.trim().to_string(),
            output_dir: self.output_dir,
            credential: self.credential.filter(|c| !c.trim().is_empty()),
            include_alternate: self.include_alternate,
            quiet: self.quiet,
            connection: ConnectionConfig {
                server: self.server,
                base_dn: self.base_dn.filter(|dn| !dn.trim().is_empty()),
                page_size: self.page_size,
                timeout: Duration::from_secs(self.timeout),
                starttls: self.starttls,
                no_tls_verify: self.no_tls_verify,
            },
        }
    }
}

fn non_blank(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("target name must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
