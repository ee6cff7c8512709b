//! # Error Taxonomy
//!
//! Setup failures are fatal and stop the run before any query is sent.
//! Everything a query can produce is recoverable: the caller turns it into a
//! warning and moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures raised while preparing a run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no directory server configured and no domain found in the environment")]
    NoServer,

    #[error("could not connect to '{server}': {reason}")]
    Connection { server: String, reason: String },

    #[error("bind as '{identity}' was rejected: {reason}")]
    Bind { identity: String, reason: String },

    #[error("could not read the default naming context: {0}")]
    RootDse(String),

    #[error("output directory '{}' is not usable: {source}", path.display())]
    OutputPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not acquire credentials for '{identity}': {reason}")]
    Credential { identity: String, reason: String },
}

impl SetupError {
    /// Short hint printed under the error so the user knows what to change.
    pub fn remediation(&self) -> &'static str {
        match self {
            SetupError::NoServer => "pass --server <host> or run from a domain-joined session",
            SetupError::Connection { .. } => {
                "check that the server is reachable and the port is open (389, or 636 for ldaps://)"
            }
            SetupError::Bind { .. } => {
                "check the identity format (user@domain or DOMAIN\\user) and the password"
            }
            SetupError::RootDse(_) => "pass the search root explicitly with --base-dn",
            SetupError::OutputPath { .. } => {
                "choose a writable location with --output-dir or fix the directory permissions"
            }
            SetupError::Credential { .. } => "run from an interactive terminal or drop --credential",
        }
    }

    /// Whether the failure comes from the directory environment rather than local setup.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            SetupError::NoServer
                | SetupError::Connection { .. }
                | SetupError::Bind { .. }
                | SetupError::RootDse(_)
        )
    }
}

/// A single directory query that did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("search under '{base}' with {filter} failed: {reason}")]
pub struct DirectoryError {
    pub base: String,
    pub filter: String,
    pub reason: String,
}

/// Node discovery could not run any of its searches.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("every node search failed, last error: {0}")]
    AllSearchesFailed(#[source] DirectoryError),
}

/// Graceful terminal conditions of the aggregation step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no nodes named '{name}' were found")]
    NoNodesFound { name: String },

    #[error("counting failed for all {failed} node(s) named '{name}'")]
    NoCountsObtained { name: String, failed: usize },
}
