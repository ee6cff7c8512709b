//! The **outbound port** towards the directory service.
//!
//! Core logic depends only on [`DirectoryClient`]; the LDAP adapter in
//! `oucount-core` and the in-memory fakes used by the tests both implement it.

use async_trait::async_trait;

use crate::error::DirectoryError;

pub mod node;

pub use node::{ContainerKind, Node};

/// Object class of the descendant entries that get counted.
pub const COMPUTER_CLASS: &str = "computer";

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Returns every container of `kind` whose naming attribute equals `name`,
    /// searched over the whole subtree below the configured root.
    async fn find_nodes_by_name(
        &self,
        name: &str,
        kind: ContainerKind,
    ) -> Result<Vec<Node>, DirectoryError>;

    /// Counts entries of `object_class` in the subtree rooted at `base`.
    async fn count_descendants_of_type(
        &self,
        base: &Node,
        object_class: &str,
    ) -> Result<u64, DirectoryError>;
}
