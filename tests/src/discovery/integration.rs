use std::fs;

use oucount_common::aggregation::{LocationSummary, UNKNOWN_LOCATION};
use oucount_common::directory::ContainerKind::{Container, OrganizationalUnit};
use oucount_common::directory::Node;
use oucount_common::error::AggregateError;
use oucount_core::pipeline::{CountProgress, RunOutcome, count_and_report};
use oucount_core::{aggregate, discovery, report};

use crate::support::FakeDirectory;

const OFFICE1: &str = "OU=ADM,OU=Office1,OU=Sites,DC=example,DC=com";
const OFFICE2: &str = "OU=ADM,OU=Office2,OU=Sites,DC=example,DC=com";

fn adm_directory() -> FakeDirectory {
    FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, Some(12))
        .with_node(OrganizationalUnit, OFFICE2, Some(5))
        .with_node(OrganizationalUnit, OFFICE1, Some(12))
}

/// The whole pipeline on the documented `ADM` example, down to the file.
#[tokio::test]
async fn adm_totals_and_report() {
    let dir = adm_directory();
    let out = tempfile::tempdir().unwrap();

    let nodes = discovery::discover(&dir, "ADM", false).await.unwrap();
    assert_eq!(nodes.len(), 3, "discovery returns raw, duplicated results");

    let agg = aggregate::aggregate(nodes, "ADM", &dir).await.unwrap();
    assert_eq!(agg.counted_nodes(), 2);
    assert_eq!(agg.total, 17);
    assert_eq!(
        agg.summaries,
        vec![
            LocationSummary::new("Office1", 12),
            LocationSummary::new("Office2", 5)
        ]
    );
    assert_eq!(dir.counted_paths(), vec![OFFICE1.to_string(), OFFICE2.to_string()]);

    report::prepare_output_dir(out.path()).unwrap();
    let path = report::write_report(out.path(), "ADM", &agg).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(path.ends_with("AD_ADM_Summary.txt"));
    assert!(text.starts_with("AD report for target node name: 'ADM'\nGenerated: "));
    assert!(text.contains("\n\nTOTAL computers under 'ADM': 17\n\n"));
    assert!(text.ends_with(
        "Summary by location (location = DN element directly above 'ADM'):\nOffice1 : 12\nOffice2 : 5\n"
    ));
}

fn entries(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[derive(Default)]
struct Recorded {
    discovered: Option<usize>,
    counted: Vec<String>,
}

impl CountProgress for Recorded {
    fn nodes_discovered(&mut self, count: usize) {
        self.discovered = Some(count);
    }

    fn node_counted(&mut self, node: &Node) {
        self.counted.push(node.distinguished_path.clone());
    }
}

#[tokio::test]
async fn counted_run_writes_exactly_one_report() {
    let dir = adm_directory();
    let out = tempfile::tempdir().unwrap();
    let mut progress = Recorded::default();

    let outcome = count_and_report(&dir, "ADM", false, out.path(), &mut progress)
        .await
        .unwrap();

    let RunOutcome::Reported { aggregation, path } = outcome else {
        panic!("expected a report, got {outcome:?}");
    };
    assert_eq!(aggregation.total, 17);
    assert_eq!(path, out.path().join("AD_ADM_Summary.txt"));
    assert!(fs::read_to_string(&path).unwrap().contains("TOTAL computers under 'ADM': 17"));
    assert_eq!(entries(out.path()), 1);

    assert_eq!(progress.discovered, Some(2), "progress sees deduplicated nodes");
    assert_eq!(progress.counted, vec![OFFICE1.to_string(), OFFICE2.to_string()]);
}

#[tokio::test]
async fn zero_nodes_found_is_graceful() {
    let dir = FakeDirectory::new();
    let out = tempfile::tempdir().unwrap();

    let outcome = count_and_report(&dir, "Kiosks", true, out.path(), &mut ())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::NoReport {
            reason: AggregateError::NoNodesFound { .. },
            discovery_failed: false,
        }
    ));
    assert!(dir.counted_paths().is_empty());
    assert_eq!(entries(out.path()), 0);
}

#[tokio::test]
async fn no_counts_obtained_leaves_no_report() {
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, None)
        .with_node(OrganizationalUnit, OFFICE2, None);
    let out = tempfile::tempdir().unwrap();

    let outcome = count_and_report(&dir, "ADM", false, out.path(), &mut ())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::NoReport {
            reason: AggregateError::NoCountsObtained { failed: 2, .. },
            discovery_failed: false,
        }
    ));
    assert_eq!(entries(out.path()), 0);
}

#[tokio::test]
async fn failed_searches_are_told_apart_from_empty_ones() {
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, Some(12))
        .failing_search(OrganizationalUnit)
        .failing_search(Container);
    let out = tempfile::tempdir().unwrap();

    let outcome = count_and_report(&dir, "ADM", true, out.path(), &mut ())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::NoReport {
            reason: AggregateError::NoNodesFound { .. },
            discovery_failed: true,
        }
    ));
    assert_eq!(entries(out.path()), 0);
}

#[tokio::test]
async fn alternate_container_is_located() {
    let dir = FakeDirectory::new()
        .with_node(Container, "CN=Kiosks,OU=Branch9,DC=x,DC=y", Some(4));

    let without = discovery::discover(&dir, "Kiosks", false).await.unwrap();
    assert!(without.is_empty());

    let nodes = discovery::discover(&dir, "Kiosks", true).await.unwrap();
    let agg = aggregate::aggregate(nodes, "Kiosks", &dir).await.unwrap();
    assert_eq!(agg.summaries, vec![LocationSummary::new("Branch9", 4)]);
}

#[tokio::test]
async fn overlapping_searches_merge_before_dedup() {
    let shared = "OU=Kiosks,OU=HQ,DC=x,DC=y";
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, shared, Some(3))
        .with_node(Container, shared, Some(3))
        .with_node(Container, "CN=Kiosks,OU=Branch9,DC=x,DC=y", Some(2));

    let nodes = discovery::discover(&dir, "Kiosks", true).await.unwrap();
    assert_eq!(nodes.len(), 3);

    let agg = aggregate::aggregate(nodes, "Kiosks", &dir).await.unwrap();
    assert_eq!(agg.total, 5);
    assert_eq!(
        agg.summaries,
        vec![LocationSummary::new("Branch9", 2), LocationSummary::new("HQ", 3)]
    );
}

#[tokio::test]
async fn failed_primary_search_falls_back_to_alternate() {
    let dir = FakeDirectory::new()
        .with_node(Container, "CN=Kiosks,OU=Branch9,DC=x,DC=y", Some(1))
        .failing_search(OrganizationalUnit);

    let nodes = discovery::discover(&dir, "Kiosks", true).await.unwrap();
    assert_eq!(nodes.len(), 1);
}

#[tokio::test]
async fn one_failed_count_is_isolated() {
    let broken = "OU=ADM,OU=Office3,OU=Sites,DC=example,DC=com";
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, Some(12))
        .with_node(OrganizationalUnit, broken, None)
        .with_node(OrganizationalUnit, OFFICE2, Some(5));

    let nodes = discovery::discover(&dir, "ADM", false).await.unwrap();
    let agg = aggregate::aggregate(nodes, "ADM", &dir).await.unwrap();

    assert_eq!(agg.total, 17);
    assert_eq!(agg.summaries.len(), 2);
    assert_eq!(agg.failures.len(), 1);
    assert_eq!(agg.failures[0].path, broken);
    assert!(agg.summaries.iter().all(|s| s.location != "Office3"));
    assert_eq!(dir.counted_paths().len(), 3, "the failure did not stop the run");
}

#[tokio::test]
async fn every_count_failing_is_distinct_from_no_nodes() {
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, None)
        .with_node(OrganizationalUnit, OFFICE2, None);

    let nodes = discovery::discover(&dir, "ADM", false).await.unwrap();
    let err = aggregate::aggregate(nodes, "ADM", &dir).await.unwrap_err();
    assert_eq!(
        err,
        AggregateError::NoCountsObtained {
            name: "ADM".into(),
            failed: 2
        }
    );
}

#[tokio::test]
async fn dedup_is_idempotent() {
    let dir = adm_directory();
    let raw = discovery::discover(&dir, "ADM", false).await.unwrap();
    let deduped = aggregate::dedup_nodes(raw.clone());

    let from_raw = aggregate::aggregate(raw, "ADM", &dir).await.unwrap();
    let from_deduped = aggregate::aggregate(deduped.clone(), "ADM", &dir).await.unwrap();

    assert_eq!(from_raw, from_deduped);
    assert_eq!(aggregate::dedup_nodes(deduped.clone()), deduped);
}

#[tokio::test]
async fn summaries_always_sum_to_total() {
    let dir = FakeDirectory::new()
        .with_node(OrganizationalUnit, OFFICE1, Some(12))
        .with_node(OrganizationalUnit, "OU=ADM,OU=Office1,OU=Other,DC=example,DC=com", Some(8))
        .with_node(OrganizationalUnit, "OU=ADM", Some(1))
        .with_node(OrganizationalUnit, "OU=ADM,CN=Users,DC=example,DC=com", Some(0));

    let nodes = discovery::discover(&dir, "ADM", false).await.unwrap();
    let agg = aggregate::aggregate(nodes, "ADM", &dir).await.unwrap();

    let sum: u64 = agg.summaries.iter().map(|s| s.total).sum();
    let located: u64 = agg.located.iter().map(|l| l.count).sum();
    assert_eq!(sum, agg.total);
    assert_eq!(located, agg.total);
    assert_eq!(agg.total, 21);
    assert_eq!(
        agg.summaries,
        vec![
            LocationSummary::new("Office1", 20),
            LocationSummary::new("Users", 0),
            LocationSummary::new(UNKNOWN_LOCATION, 1),
        ]
    );
}
