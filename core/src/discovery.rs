//! # Node Discovery Service
//!
//! Finds every container named like the target.
//!
//! The primary search looks at organizational units. The alternate search,
//! when enabled, also looks at plain containers. A failing search only costs
//! its own results: it is reported as a warning and the other search still
//! counts.

use oucount_common::directory::{ContainerKind, DirectoryClient, Node};
use oucount_common::error::{DirectoryError, DiscoveryError};
use oucount_common::{info, warn};

/// Runs the node searches for `name` and returns the merged, not yet
/// deduplicated, result.
///
/// An empty `Ok` means the searches ran and matched nothing. `Err` means not
/// a single search completed.
pub async fn discover(
    client: &dyn DirectoryClient,
    name: &str,
    include_alternate: bool,
) -> Result<Vec<Node>, DiscoveryError> {
    let mut kinds = vec![ContainerKind::OrganizationalUnit];
    if include_alternate {
        kinds.push(ContainerKind::Container);
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut last_error: Option<DirectoryError> = None;
    let mut completed = 0usize;

    for kind in kinds {
        match client.find_nodes_by_name(name, kind).await {
            Ok(found) => {
                info!("Found {} {} node(s) named '{}'", found.len(), kind, name);
                completed += 1;
                nodes.extend(found);
            }
            Err(e) => {
                warn!("Search for {} nodes named '{}' failed: {}", kind, name, e.reason);
                last_error = Some(e);
            }
        }
    }

    match (completed, last_error) {
        (0, Some(e)) => Err(DiscoveryError::AllSearchesFailed(e)),
        _ => Ok(nodes),
    }
}
