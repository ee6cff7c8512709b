//! # Count Pipeline
//!
//! One pass of discover → aggregate → report against any [`DirectoryClient`].
//! A report file is written only when at least one node was counted; both
//! terminal conditions leave the output directory untouched.

use std::io;
use std::path::{Path, PathBuf};

use oucount_common::aggregation::Aggregation;
use oucount_common::directory::{DirectoryClient, Node};
use oucount_common::error::AggregateError;
use oucount_common::warn;

use crate::aggregate::{aggregate_with_progress, dedup_nodes};
use crate::{discovery, report};

/// Hooks the presentation layer uses to drive a progress display.
pub trait CountProgress {
    fn nodes_discovered(&mut self, _count: usize) {}
    fn node_counted(&mut self, _node: &Node) {}
}

impl CountProgress for () {}

#[derive(Debug)]
pub enum RunOutcome {
    Reported {
        aggregation: Aggregation,
        path: PathBuf,
    },
    NoReport {
        reason: AggregateError,
        /// Every node search failed, as opposed to searches matching nothing.
        discovery_failed: bool,
    },
}

/// Runs the pipeline for `target_name` and writes the report into `output_dir`.
///
/// Only a failure to write the report is an error; query failures end up as
/// warnings or as [`RunOutcome::NoReport`].
pub async fn count_and_report(
    client: &dyn DirectoryClient,
    target_name: &str,
    include_alternate: bool,
    output_dir: &Path,
    progress: &mut dyn CountProgress,
) -> io::Result<RunOutcome> {
    let (nodes, discovery_failed) =
        match discovery::discover(client, target_name, include_alternate).await {
            Ok(nodes) => (dedup_nodes(nodes), false),
            Err(e) => {
                warn!("{}", e);
                (Vec::new(), true)
            }
        };
    progress.nodes_discovered(nodes.len());

    match aggregate_with_progress(nodes, target_name, client, |node| progress.node_counted(node)).await
    {
        Ok(aggregation) => {
            let path = report::write_report(output_dir, target_name, &aggregation)?;
            Ok(RunOutcome::Reported { aggregation, path })
        }
        Err(reason) => {
            warn!("{}; no report written", reason);
            Ok(RunOutcome::NoReport {
                reason,
                discovery_failed,
            })
        }
    }
}
