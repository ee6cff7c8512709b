//! Records produced by the aggregation step.

/// Grouping label used when no location can be read from a path.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Count of descendant computers under one discovered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCount {
    pub path: String,
    pub location: String,
    pub count: u64,
}

/// A node whose count query failed. It contributes nothing to any total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountFailure {
    pub path: String,
    pub reason: String,
}

/// Total of all nodes sharing one location label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSummary {
    pub location: String,
    pub total: u64,
}

impl LocationSummary {
    pub fn new(location: impl Into<String>, total: u64) -> Self {
        Self {
            location: location.into(),
            total,
        }
    }
}

/// Outcome of a successful aggregation.
///
/// `summaries` is sorted by location and always sums to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub total: u64,
    pub located: Vec<LocatedCount>,
    pub summaries: Vec<LocationSummary>,
    pub failures: Vec<CountFailure>,
}

impl Aggregation {
    pub fn counted_nodes(&self) -> usize {
        self.located.len()
    }

    /// Width of the longest location label, for aligned output.
    pub fn location_width(&self) -> usize {
        self.summaries
            .iter()
            .map(|s| s.location.chars().count())
            .max()
            .unwrap_or(0)
    }
}
