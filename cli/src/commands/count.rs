use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tracing::{Instrument, Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::{colors, format, print, prompt, spinner};
use oucount_common::aggregation::Aggregation;
use oucount_common::config::Config;
use oucount_common::directory::{DirectoryClient, Node};
use oucount_common::error::AggregateError;
use oucount_common::{success, warn};
use oucount_core::ldap::LdapDirectory;
use oucount_core::pipeline::{self, CountProgress, RunOutcome};
use oucount_core::report;

/// Runs one full pass: setup, discovery, counting, report.
///
/// Setup problems are returned as errors. Everything after the connection is
/// up ends in `Ok`, with warnings for whatever could not be counted.
pub async fn count(cfg: &Config) -> anyhow::Result<()> {
    report::prepare_output_dir(&cfg.output_dir)?;

    let credential = match &cfg.credential {
        Some(identity) => Some(prompt::read_credential(identity)?),
        None => None,
    };

    let directory = LdapDirectory::connect(&cfg.connection, credential.as_ref()).await?;
    let setup_lines: [(&str, &str); 2] = [
        ("Search root", directory.base_dn()),
        ("Target", cfg.target_name.as_str()),
    ];
    print::set_key_width(print::key_width(setup_lines.iter().map(|(key, _)| *key)));
    for (key, value) in setup_lines {
        print::aligned_line(key, value);
    }

    let outcome = count_and_report(&directory, cfg).await;
    directory.close().await;
    outcome
}

/// Drives the progress bar of the counting span.
struct SpanProgress(Span);

impl CountProgress for SpanProgress {
    fn nodes_discovered(&mut self, count: usize) {
        self.0.pb_set_length(count as u64);
        self.0.pb_set_message("Counting computers");
    }

    fn node_counted(&mut self, _node: &Node) {
        self.0.pb_inc(1);
    }
}

async fn count_and_report(directory: &dyn DirectoryClient, cfg: &Config) -> anyhow::Result<()> {
    let start_time: Instant = Instant::now();

    let span = info_span!("counting", indicatif.pb_show = true);
    span.pb_set_style(&spinner::counting_style());
    span.pb_set_message("Searching nodes");

    let mut progress = SpanProgress(span.clone());
    let outcome = pipeline::count_and_report(
        directory,
        &cfg.target_name,
        cfg.include_alternate,
        &cfg.output_dir,
        &mut progress,
    )
    .instrument(span)
    .await
    .with_context(|| format!("failed to write the report into '{}'", cfg.output_dir.display()))?;
    drop(progress);

    match outcome {
        RunOutcome::Reported { aggregation, path } => {
            counting_ends(&aggregation, cfg, &path, start_time);
        }
        RunOutcome::NoReport {
            reason,
            discovery_failed,
        } => {
            if let Some(hint) = unbound_search_hint(discovery_failed, cfg.credential.is_some()) {
                print::hint(hint);
            }
            match reason {
                AggregateError::NoNodesFound { .. } => no_nodes_found(cfg),
                AggregateError::NoCountsObtained { .. } => print::end_of_program(),
            }
        }
    }
    Ok(())
}

/// Anonymous sessions are usually refused by Active Directory, which makes
/// every search fail. Point the user at `--credential` in that case.
fn unbound_search_hint(discovery_failed: bool, has_credential: bool) -> Option<&'static str> {
    (discovery_failed && !has_credential).then_some(
        "the session was not bound; pass --credential <identity> if the server refuses anonymous searches",
    )
}

fn counting_ends(aggregation: &Aggregation, cfg: &Config, path: &Path, start_time: Instant) {
    if cfg.quiet == 0 {
        print::header("Matched Nodes", cfg.quiet);
        print_nodes(aggregation);
    }

    print::header("Summary by location", cfg.quiet);
    print::print(&format!(
        "TOTAL computers under '{}': {}",
        cfg.target_name,
        format::count_value(aggregation.total)
    ));
    print::set_key_width(aggregation.location_width());
    for summary in &aggregation.summaries {
        print::aligned_line(&summary.location, format::count_value(summary.total));
    }

    print::fat_separator();
    let nodes: ColoredString = format!("{} node(s)", aggregation.counted_nodes()).bold().green();
    let total_time: ColoredString =
        format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::centerln(
        &format!("Count Complete: {} counted in {}", nodes, total_time).color(colors::TEXT_DEFAULT),
    );
    if !aggregation.failures.is_empty() {
        warn!(
            "{} node(s) could not be counted and are not part of the total",
            aggregation.failures.len()
        );
    }
    success!("Report written to {}", path.display());
    print::end_of_program();
}

fn print_nodes(aggregation: &Aggregation) {
    let mut idx: usize = 0;
    for located in &aggregation.located {
        print::tree_head(idx, &located.path);
        print::as_tree_one_level(format::located_to_details(located));
        idx += 1;
    }
    for failure in &aggregation.failures {
        print::tree_head(idx, &failure.path);
        print::as_tree_one_level(format::failure_to_details(failure));
        idx += 1;
    }
}

fn no_nodes_found(cfg: &Config) {
    print::header("ZERO NODES FOUND", cfg.quiet);
    print::no_results(cfg.quiet);
    print::end_of_program();
}
