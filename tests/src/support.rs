use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use oucount_common::directory::{ContainerKind, DirectoryClient, Node};
use oucount_common::error::DirectoryError;

/// In-memory directory with scripted answers and failures.
#[derive(Default)]
pub struct FakeDirectory {
    nodes: HashMap<ContainerKind, Vec<Node>>,
    failing_kinds: HashSet<ContainerKind>,
    counts: HashMap<String, u64>,
    counted: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of `kind`; a `Some` count makes its count query succeed.
    pub fn with_node(mut self, kind: ContainerKind, path: &str, count: Option<u64>) -> Self {
        let name = path
            .split(',')
            .next()
            .and_then(|rdn| rdn.split_once('='))
            .map(|(_, v)| v)
            .unwrap_or_default();
        self.nodes
            .entry(kind)
            .or_default()
            .push(Node::new(path, name));
        if let Some(count) = count {
            self.counts.insert(path.to_string(), count);
        }
        self
    }

    pub fn failing_search(mut self, kind: ContainerKind) -> Self {
        self.failing_kinds.insert(kind);
        self
    }

    /// Paths whose count was queried, in call order.
    pub fn counted_paths(&self) -> Vec<String> {
        self.counted.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn find_nodes_by_name(
        &self,
        name: &str,
        kind: ContainerKind,
    ) -> Result<Vec<Node>, DirectoryError> {
        if self.failing_kinds.contains(&kind) {
            return Err(DirectoryError {
                base: "DC=example,DC=com".into(),
                filter: format!("(objectClass={})", kind.object_class()),
                reason: "server busy".into(),
            });
        }
        Ok(self
            .nodes
            .get(&kind)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter(|n| n.name.eq_ignore_ascii_case(name))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_descendants_of_type(
        &self,
        base: &Node,
        object_class: &str,
    ) -> Result<u64, DirectoryError> {
        if let Ok(mut counted) = self.counted.lock() {
            counted.push(base.distinguished_path.clone());
        }
        self.counts
            .get(&base.distinguished_path)
            .copied()
            .ok_or_else(|| DirectoryError {
                base: base.distinguished_path.clone(),
                filter: format!("(objectClass={object_class})"),
                reason: "operations error".into(),
            })
    }
}
