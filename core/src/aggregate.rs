//! # Aggregator
//!
//! Turns the raw discovery result into totals:
//! 1. **Dedup**: overlapping searches may return the same node twice.
//! 2. **Count**: one subtree count per node, failures isolated per node.
//! 3. **Group**: sum counts per location, ordered by label.

use std::collections::{BTreeMap, HashSet};

use oucount_common::aggregation::{Aggregation, CountFailure, LocatedCount, LocationSummary};
use oucount_common::directory::{COMPUTER_CLASS, DirectoryClient, Node};
use oucount_common::error::AggregateError;
use oucount_common::warn;
use tracing::debug;

use crate::location::extract_location;

/// Aggregates `nodes` without progress reporting.
pub async fn aggregate(
    nodes: Vec<Node>,
    target_name: &str,
    client: &dyn DirectoryClient,
) -> Result<Aggregation, AggregateError> {
    aggregate_with_progress(nodes, target_name, client, |_| {}).await
}

/// Aggregates `nodes`, calling `on_node_done` once per unique node after its
/// count query returns, whether it succeeded or not.
pub async fn aggregate_with_progress<F>(
    nodes: Vec<Node>,
    target_name: &str,
    client: &dyn DirectoryClient,
    mut on_node_done: F,
) -> Result<Aggregation, AggregateError>
where
    F: FnMut(&Node),
{
    let nodes = dedup_nodes(nodes);
    if nodes.is_empty() {
        return Err(AggregateError::NoNodesFound {
            name: target_name.to_string(),
        });
    }

    let mut located: Vec<LocatedCount> = Vec::with_capacity(nodes.len());
    let mut failures: Vec<CountFailure> = Vec::new();

    for node in &nodes {
        match client.count_descendants_of_type(node, COMPUTER_CLASS).await {
            Ok(count) => {
                let location = extract_location(&node.distinguished_path, target_name);
                debug!(path = %node, %location, count, "counted node");
                located.push(LocatedCount {
                    path: node.distinguished_path.clone(),
                    location,
                    count,
                });
            }
            Err(e) => {
                warn!("Could not count computers under '{}': {}", node, e.reason);
                failures.push(CountFailure {
                    path: node.distinguished_path.clone(),
                    reason: e.reason,
                });
            }
        }
        on_node_done(node);
    }

    if located.is_empty() {
        return Err(AggregateError::NoCountsObtained {
            name: target_name.to_string(),
            failed: failures.len(),
        });
    }

    let total = located
        .iter()
        .fold(0u64, |acc, lc| acc.saturating_add(lc.count));
    let summaries = summarize(&located);

    Ok(Aggregation {
        total,
        located,
        summaries,
        failures,
    })
}

/// Keeps the first node seen for every distinguished path, in input order.
pub fn dedup_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut seen: HashSet<String> = HashSet::with_capacity(nodes.len());
    nodes
        .into_iter()
        .filter(|node| seen.insert(node.distinguished_path.clone()))
        .collect()
}

/// Sums counts per location. The result is sorted by label and never holds
/// an empty group.
pub fn summarize(located: &[LocatedCount]) -> Vec<LocationSummary> {
    let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
    for lc in located {
        let entry = groups.entry(lc.location.as_str()).or_insert(0);
        *entry = entry.saturating_add(lc.count);
    }
    groups
        .into_iter()
        .map(|(location, total)| LocationSummary::new(location, total))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
