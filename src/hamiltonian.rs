pub mod backtrack;
pub mod heuristic;
pub mod limits;
pub mod options;
pub mod outcome;
pub mod path;
pub mod prune;
pub mod verify;

pub use backtrack::{backtrack_search, plain_backtrack_search, MAX_SEARCH_VERTICES};
pub use heuristic::heuristic_search;
pub use limits::Limits;
pub use options::{
    select_initial_vertex, Algorithm, BacktrackOptions, Completion, DegreeOrder,
    HeuristicOptions, InitialVertex, SolverOptions, VisitPolicy,
};
pub use outcome::{SearchOutcome, SearchReport, SearchStats};
pub use path::Path;
pub use prune::{prune, prune_graph, PruneFlags, PruneOutcome, PruneResult};
pub use verify::verify_solution;

use rand::Rng;

use crate::error::{Error, Result};
use crate::graph::Graph;

/// Run the algorithm selected in `options` and verify what it finds.
///
/// A reported cycle that fails [`verify_solution`] is an internal error,
/// returned as [`Error::InvalidSolution`].
pub fn solve<R: Rng + ?Sized>(
    graph: &Graph,
    options: &SolverOptions,
    rng: &mut R,
) -> Result<SearchReport> {
    let report = match options.algorithm {
        Algorithm::PlainBacktrack => plain_backtrack_search(graph, &options.backtrack, rng)?,
        Algorithm::Backtrack => backtrack_search(graph, &options.backtrack, rng)?,
        Algorithm::Heuristic => heuristic_search(graph, &options.heuristic, rng)?,
    };
    if let SearchOutcome::Found(cycle) = &report.outcome {
        if !verify_solution(graph, cycle) {
            return Err(Error::InvalidSolution(cycle.clone()));
        }
    }
    Ok(report)
}
