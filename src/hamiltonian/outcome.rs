use std::fmt;
use std::time::Duration;

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A Hamiltonian cycle, as a vertex order read cyclically.
    Found(Vec<usize>),
    /// The graph provably has no Hamiltonian cycle.
    NotExist,
    /// The search gave up or ran out of budget; existence is unknown.
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn solution(&self) -> Option<&[usize]> {
        match self {
            SearchOutcome::Found(order) => Some(order),
            _ => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(_) => f.write_str("found"),
            SearchOutcome::NotExist => f.write_str("does not exist"),
            SearchOutcome::NotFound => f.write_str("not found"),
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Recursive entries (backtracking) or walk steps (heuristic).
    pub nodes: u64,
    /// Edges removed during the search itself.
    pub edges_pruned: usize,
    /// Edges removed by the pruning pass before the search.
    pub initial_pruned: usize,
    /// Start vertices tried before the successful one (heuristic only).
    pub retries: usize,
    pub elapsed: Duration,
    pub hit_time_limit: bool,
    pub hit_node_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    pub(crate) fn new(outcome: SearchOutcome, stats: SearchStats) -> Self {
        SearchReport { outcome, stats }
    }
}
