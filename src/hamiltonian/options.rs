//! Search configuration.
//!
//! Every knob is an enum matched exhaustively by the searches; the numeric
//! ones are validated when a search starts.

use std::time::Duration;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use super::prune::PruneFlags;
use crate::error::{Error, Result};
use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Backtracking without pruning inside the recursion.
    PlainBacktrack,
    /// Backtracking with pruning after every step.
    #[default]
    Backtrack,
    /// Randomized rotation search; may give up on graphs that have a cycle.
    Heuristic,
}

/// How the backtracking search picks its first vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialVertex {
    #[default]
    Random,
    /// Uniformly among the vertices of maximum degree.
    MaxDegree,
    /// With probability proportional to degree.
    DegreeWeighted,
    /// Vertex 0.
    First,
}

/// Order in which the backtracking search tries the end's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeOrder {
    /// Adjacency list order.
    #[default]
    Unsorted,
    /// Lowest degree first, ties in random order.
    Min,
    /// Highest degree first, ties in random order.
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitPolicy {
    /// Any neighbor, scanned from a random offset.
    #[default]
    Random,
    /// Prefer forced and unvisited neighbors and avoid breaking forced edges.
    Smart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// A full path counts only if its end is adjacent to its start.
    #[default]
    Simple,
    /// Also try one rotation to close the cycle.
    Rotate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackOptions {
    pub initial_vertex: InitialVertex,
    pub degree_order: DegreeOrder,
    /// Rules re-run after each step; the initial pass always uses all rules.
    pub prune_flags: PruneFlags,
    /// Enables iterated restart; the node budget grows by this factor.
    pub restart_factor: Option<u64>,
    /// 0 means unlimited.
    pub node_limit: u64,
    pub time_limit: Option<Duration>,
}

impl Default for BacktrackOptions {
    fn default() -> Self {
        BacktrackOptions {
            initial_vertex: InitialVertex::default(),
            degree_order: DegreeOrder::default(),
            prune_flags: PruneFlags::ALL,
            restart_factor: None,
            node_limit: 0,
            time_limit: None,
        }
    }
}

impl BacktrackOptions {
    pub fn validate(&self) -> Result<()> {
        match self.restart_factor {
            Some(k) if k < 2 => Err(Error::InvalidOption(format!(
                "restart factor must be at least 2, got {k}"
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeuristicOptions {
    pub visit: VisitPolicy,
    pub completion: Completion,
    /// Break a closed cycle to reach unvisited vertices when stuck.
    pub cycle_extension: bool,
    pub time_limit: Option<Duration>,
}

impl HeuristicOptions {
    /// Turn on cycle extension together with the smart visit and rotating
    /// completion it relies on.
    pub fn with_cycle_extension(mut self) -> Self {
        self.cycle_extension = true;
        self.visit = VisitPolicy::Smart;
        self.completion = Completion::Rotate;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverOptions {
    pub algorithm: Algorithm,
    pub backtrack: BacktrackOptions,
    pub heuristic: HeuristicOptions,
}

/// Pick the vertex the backtracking search starts from.
///
/// `graph` must have at least one vertex.
pub fn select_initial_vertex<R: Rng + ?Sized>(
    graph: &Graph,
    policy: InitialVertex,
    rng: &mut R,
) -> usize {
    let n = graph.num_vertices();
    match policy {
        InitialVertex::Random => rng.gen_range(0..n),
        InitialVertex::MaxDegree => {
            let max = (0..n).map(|v| graph.degree(v)).max().unwrap_or(0);
            let tied: Vec<usize> = (0..n).filter(|&v| graph.degree(v) == max).collect();
            tied.choose(rng).copied().unwrap_or(0)
        }
        InitialVertex::DegreeWeighted => match WeightedIndex::new((0..n).map(|v| graph.degree(v))) {
            Ok(dist) => dist.sample(rng),
            // edgeless graph
            Err(_) => rng.gen_range(0..n),
        },
        InitialVertex::First => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;

    fn star() -> Graph {
        Graph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2)]).unwrap()
    }

    #[test]
    fn test_max_degree_vertex() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(select_initial_vertex(&star(), InitialVertex::MaxDegree, &mut rng), 0);
        }
    }

    #[test]
    fn test_weighted_skips_isolated() {
        let g = Graph::from_edges(4, &[(1, 2)]).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..50 {
            let v = select_initial_vertex(&g, InitialVertex::DegreeWeighted, &mut rng);
            assert!(v == 1 || v == 2);
        }
        // no edges at all falls back to uniform
        let v = select_initial_vertex(&Graph::new(3), InitialVertex::DegreeWeighted, &mut rng);
        assert!(v < 3);
    }

    #[test]
    fn test_first_and_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        assert_eq!(select_initial_vertex(&star(), InitialVertex::First, &mut rng), 0);
        let v = select_initial_vertex(&star(), InitialVertex::Random, &mut rng);
        assert!(v < 5);
    }

    #[test]
    fn test_restart_factor_validation() {
        let mut opts = BacktrackOptions::default();
        assert!(opts.validate().is_ok());
        opts.restart_factor = Some(1);
        assert!(matches!(opts.validate(), Err(Error::InvalidOption(_))));
        opts.restart_factor = Some(2);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_cycle_extension_implies_smart() {
        let opts = HeuristicOptions::default().with_cycle_extension();
        assert_eq!(opts.visit, VisitPolicy::Smart);
        assert_eq!(opts.completion, Completion::Rotate);
        assert!(opts.cycle_extension);
    }
}
